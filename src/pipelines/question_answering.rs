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

//! # Question Answering pipeline
//! Extractive question answering: the answer is a span of the context. By default the model is a
//! DistilBERT finetuned on SQuAD.
//!
//! ```no_run
//! use nlp_genie::pipelines::question_answering::{answer, QaInput};
//! # use nlp_genie::backends::NlpBackend;
//! # async fn run(backend: &dyn NlpBackend) -> anyhow::Result<()> {
//! let qa_input = QaInput::from_inputs(
//!     Some("Amy lives in Amsterdam"),
//!     Some("Where does Amy live ?"),
//! )
//! .unwrap();
//! let output = answer(backend, &qa_input).await?;
//! # Ok(())
//! # }
//! ```

use crate::backends::NlpBackend;
use crate::common::error::GenieError;
use crate::pipelines::common::{capitalize_sentences, provided};

pub const CONTEXT_PLACEHOLDER: &str = "Enter the Context Here";

pub const QUESTION_PLACEHOLDER: &str = "Enter your Question Here";

#[derive(Debug, Clone, PartialEq)]
/// # Input for Question Answering
/// Includes a context (containing the answer) and question strings
pub struct QaInput {
    /// Question to answer
    pub question: String,
    /// Context containing the answer
    pub context: String,
}

impl QaInput {
    /// Guard: both the context and the question must be provided and differ from their
    /// placeholders.
    pub fn from_inputs(context: Option<&str>, question: Option<&str>) -> Option<QaInput> {
        let context = provided(context, Some(CONTEXT_PLACEHOLDER))?;
        let question = provided(question, Some(QUESTION_PLACEHOLDER))?;
        Some(QaInput {
            question: question.to_string(),
            context: context.to_string(),
        })
    }
}

pub async fn answer(backend: &dyn NlpBackend, qa_input: &QaInput) -> Result<String, GenieError> {
    let answer = backend
        .answer_question(&qa_input.question, &qa_input.context)
        .await?;
    Ok(capitalize_sentences(&answer))
}

pub fn display(answer: &str) -> String {
    format!("Here's your Answer:\n{answer}")
}
