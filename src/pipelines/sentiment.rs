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

//! # Sentiment Analysis pipeline
//! Classifies the sentiment of a text and maps the label to a fixed message. By default the
//! model is a DistilBERT finetuned on SST-2, which only predicts `POSITIVE` or `NEGATIVE`.
//! A `NEUTRAL` label is still handled for models that produce it.

use crate::backends::NlpBackend;
use crate::common::error::GenieError;
use crate::pipelines::common::provided;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER: &str = "Enter Text Here";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Label and confidence returned by the classifier
pub struct SentimentScore {
    /// Raw label (e.g. `POSITIVE`)
    pub label: String,
    /// Confidence score
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// # Sentiment polarities with a display message
pub enum SentimentPolarity {
    Positive,
    Negative,
    Neutral,
}

impl SentimentPolarity {
    /// Exact, case-sensitive match on the classifier label. Unknown labels have no polarity.
    pub fn from_label(label: &str) -> Option<SentimentPolarity> {
        match label {
            "POSITIVE" => Some(SentimentPolarity::Positive),
            "NEGATIVE" => Some(SentimentPolarity::Negative),
            "NEUTRAL" => Some(SentimentPolarity::Neutral),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SentimentPolarity::Positive => "This text has a Positive Sentiment. 🤗",
            SentimentPolarity::Negative => "This text has a Negative Sentiment. 😤",
            SentimentPolarity::Neutral => "This text seems Neutral... 😐",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Sentiment ready for display
pub struct SentimentReport {
    pub label: String,
    pub score: f64,
    /// Message for the label, `None` when the label is not one of the known polarities
    pub message: Option<String>,
}

impl From<SentimentScore> for SentimentReport {
    fn from(sentiment: SentimentScore) -> Self {
        let message = SentimentPolarity::from_label(&sentiment.label)
            .map(|polarity| polarity.message().to_string());
        SentimentReport {
            label: sentiment.label,
            score: sentiment.score,
            message,
        }
    }
}

pub fn guard(text: Option<&str>) -> Option<&str> {
    provided(text, Some(PLACEHOLDER))
}

/// Classifies `text` and keeps the first (top) prediction.
pub async fn classify(
    backend: &dyn NlpBackend,
    text: &str,
) -> Result<SentimentReport, GenieError> {
    let sentiment = backend
        .classify_sentiment(text)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            GenieError::BackendError("sentiment classifier returned no prediction".to_string())
        })?;
    Ok(sentiment.into())
}

/// Display text of the report. Nothing for unknown labels.
pub fn display(report: &SentimentReport) -> Option<String> {
    report.message.clone()
}
