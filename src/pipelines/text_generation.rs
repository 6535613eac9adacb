// Copyright 2024 The NLP Genie Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Text generation pipeline
//! Completes a prompt with a GPT-2 style language model. The generated text includes the prompt.

use crate::backends::NlpBackend;
use crate::common::error::GenieError;
use crate::pipelines::common::{capitalize_sentences, provided};

pub const PLACEHOLDER: &str = "Enter the Text to complete";

pub fn guard(text: Option<&str>) -> Option<&str> {
    provided(text, Some(PLACEHOLDER))
}

pub async fn complete(backend: &dyn NlpBackend, prompt: &str) -> Result<String, GenieError> {
    let generated = backend.complete_text(prompt).await?;
    Ok(capitalize_sentences(&generated))
}

pub fn display(generated_text: &str) -> String {
    format!("Here's your Generated Text:\n{generated_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_rejects_placeholder() {
        assert_eq!(guard(Some(PLACEHOLDER)), None);
        assert_eq!(guard(None), None);
        assert_eq!(guard(Some("The dog")), Some("The dog"));
    }

    #[test]
    fn display_format() {
        assert_eq!(
            display("The dog ran. It was fast"),
            "Here's your Generated Text:\nThe dog ran. It was fast"
        );
    }
}
