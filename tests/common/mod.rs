#![allow(dead_code)]

use async_trait::async_trait;
use nlp_genie::backends::NlpBackend;
use nlp_genie::pipelines::ner::EntitySpan;
use nlp_genie::pipelines::sentiment::SentimentScore;
use nlp_genie::GenieError;
use std::sync::{Arc, Mutex};

/// Backend call, recorded with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Summarize {
        text: String,
        min_length: i64,
        max_length: i64,
    },
    ExtractEntities(String),
    ClassifySentiment(String),
    AnswerQuestion {
        question: String,
        context: String,
    },
    CompleteText(String),
}

/// Fake backend returning canned outputs and recording every call it receives.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    failure: Option<String>,
    sentiment_label: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Arc<RecordingBackend> {
        Arc::new(RecordingBackend::default())
    }

    /// Every call fails with a `BackendError` carrying `message`.
    pub fn failing(message: &str) -> Arc<RecordingBackend> {
        Arc::new(RecordingBackend {
            failure: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn with_sentiment(label: &str) -> Arc<RecordingBackend> {
        Arc::new(RecordingBackend {
            sentiment_label: Some(label.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), GenieError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(GenieError::BackendError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NlpBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn summarize(
        &self,
        text: &str,
        min_length: i64,
        max_length: i64,
    ) -> Result<String, GenieError> {
        self.record(Call::Summarize {
            text: text.to_string(),
            min_length,
            max_length,
        })?;
        Ok("water vapour was found on k2-18b. it is a habitable planet".to_string())
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, GenieError> {
        self.record(Call::ExtractEntities(text.to_string()))?;
        let spans = [("Amy", "B-PER", 0, 3), ("Paris", "I-LOC", 13, 18)];
        Ok(spans
            .iter()
            .map(|(word, label, start, end)| EntitySpan {
                word: word.to_string(),
                score: 0.99,
                label: label.to_string(),
                start: Some(*start),
                end: Some(*end),
            })
            .collect())
    }

    async fn classify_sentiment(&self, text: &str) -> Result<Vec<SentimentScore>, GenieError> {
        self.record(Call::ClassifySentiment(text.to_string()))?;
        let label = self.sentiment_label.as_deref().unwrap_or("POSITIVE");
        Ok(vec![
            SentimentScore {
                label: label.to_string(),
                score: 0.98,
            },
            SentimentScore {
                label: "NEGATIVE".to_string(),
                score: 0.02,
            },
        ])
    }

    async fn answer_question(&self, question: &str, context: &str) -> Result<String, GenieError> {
        self.record(Call::AnswerQuestion {
            question: question.to_string(),
            context: context.to_string(),
        })?;
        Ok("paris".to_string())
    }

    async fn complete_text(&self, text: &str) -> Result<String, GenieError> {
        self.record(Call::CompleteText(text.to_string()))?;
        Ok(format!("{text} and then IT RAINED. the end"))
    }
}
