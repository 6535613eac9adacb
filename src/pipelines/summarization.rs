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

//! # Summarization pipeline
//! Abstractive summarization of a free-text body. The user picks the minimum number of words of
//! the summary, the maximum length is fixed by configuration (50 by default).
//!
//! ```no_run
//! use nlp_genie::pipelines::summarization::{summarize, SummarizationRequest};
//! # use nlp_genie::backends::NlpBackend;
//! # async fn run(backend: &dyn NlpBackend) -> anyhow::Result<()> {
//! let input = "In findings published Tuesday in Cornell University's arXiv by a team of scientists \
//! from the University of Montreal and a separate report published Wednesday in Nature Astronomy \
//! by a team from University College London (UCL), the presence of water vapour was confirmed in \
//! the atmosphere of K2-18b, a planet circling a star in the constellation Leo.";
//!
//! let request = SummarizationRequest::from_inputs(Some(input), Some(10.0), 50).unwrap();
//! let summary = summarize(backend, &request).await?;
//! # Ok(())
//! # }
//! ```

use crate::backends::NlpBackend;
use crate::common::error::GenieError;
use crate::pipelines::common::{capitalize_sentences, provided};

/// Default upper bound on the summary length
pub const DEFAULT_MAX_LENGTH: i64 = 50;

#[derive(Debug, Clone, PartialEq)]
/// # Validated summarization request
pub struct SummarizationRequest {
    /// Text to summarize
    pub text: String,
    /// Minimum summary length, from the user supplied number of words
    pub min_length: i64,
    /// Maximum summary length
    pub max_length: i64,
}

impl SummarizationRequest {
    /// Builds a request if the guard passes: the text is non-empty and a usable word count was
    /// provided. Returns `None` otherwise, in which case nothing should be invoked.
    ///
    /// The word count is truncated toward zero and clamped to `max_length`.
    pub fn from_inputs(
        text: Option<&str>,
        num_words: Option<f64>,
        max_length: i64,
    ) -> Option<SummarizationRequest> {
        let text = provided(text, None)?;
        let min_length = word_count(num_words)?.min(max_length);
        Some(SummarizationRequest {
            text: text.to_string(),
            min_length,
            max_length,
        })
    }
}

/// Converts the number entered by the user into a token count.
/// Negative and non-finite values count as not provided.
pub fn word_count(num_words: Option<f64>) -> Option<i64> {
    let num_words = num_words?;
    if !num_words.is_finite() || num_words < 0.0 {
        return None;
    }
    Some(num_words.trunc() as i64)
}

/// Runs the summarization and post-processes the summary sentences.
pub async fn summarize(
    backend: &dyn NlpBackend,
    request: &SummarizationRequest,
) -> Result<String, GenieError> {
    let summary = backend
        .summarize(&request.text, request.min_length, request.max_length)
        .await?;
    Ok(capitalize_sentences(&summary))
}

pub fn display(summary: &str) -> String {
    format!("Here's your Summary: {summary}")
}
