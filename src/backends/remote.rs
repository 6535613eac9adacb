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

//! # Hugging Face Inference API backend
//! Every task is a `POST {base_url}/{model_id}` with a JSON body of the form
//! `{ "inputs": ..., "parameters": {...}, "options": { "wait_for_model": true } }`.
//! A single pooled HTTP client is shared by all requests.

use crate::backends::NlpBackend;
use crate::common::config::{GenieConfig, ModelIds};
use crate::common::error::GenieError;
use crate::pipelines::ner::EntitySpan;
use crate::pipelines::sentiment::SentimentScore;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub struct RemoteBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    models: ModelIds,
    generation_max_length: i64,
}

impl RemoteBackend {
    pub fn new(config: &GenieConfig) -> Result<RemoteBackend, GenieError> {
        let mut builder =
            Client::builder().user_agent(concat!("nlp-genie/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.remote.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        Ok(RemoteBackend {
            client: builder.build()?,
            base_url: config.remote.base_url.trim_end_matches('/').to_string(),
            api_token: config.remote.api_token.clone(),
            models: config.remote.models.clone(),
            generation_max_length: config.generation_max_length,
        })
    }

    pub fn endpoint(&self, model_id: &str) -> String {
        format!("{}/{}", self.base_url, model_id)
    }

    async fn infer(
        &self,
        model_id: &str,
        inputs: Value,
        parameters: Value,
    ) -> Result<Value, GenieError> {
        let mut payload = json!({
            "inputs": inputs,
            "options": { "wait_for_model": true },
        });
        if !parameters.is_null() {
            payload["parameters"] = parameters;
        }

        let url = self.endpoint(model_id);
        tracing::debug!(%url, "sending inference request");
        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenieError::BackendError(api_error_message(status, &body)));
        }
        serde_json::from_str(&body).map_err(|error| {
            GenieError::BackendError(format!("response from {model_id} is not JSON: {error}"))
        })
    }
}

#[async_trait]
impl NlpBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn summarize(
        &self,
        text: &str,
        min_length: i64,
        max_length: i64,
    ) -> Result<String, GenieError> {
        let body = self
            .infer(
                &self.models.summarization,
                json!(text),
                json!({ "min_length": min_length, "max_length": max_length }),
            )
            .await?;
        parse_summary(body)
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, GenieError> {
        let body = self
            .infer(
                &self.models.ner,
                json!(text),
                json!({ "aggregation_strategy": "simple" }),
            )
            .await?;
        parse_entities(body)
    }

    async fn classify_sentiment(&self, text: &str) -> Result<Vec<SentimentScore>, GenieError> {
        let body = self
            .infer(&self.models.sentiment, json!(text), Value::Null)
            .await?;
        parse_sentiment(body)
    }

    async fn answer_question(&self, question: &str, context: &str) -> Result<String, GenieError> {
        let body = self
            .infer(
                &self.models.question_answering,
                json!({ "question": question, "context": context }),
                Value::Null,
            )
            .await?;
        parse_answer(body)
    }

    async fn complete_text(&self, text: &str) -> Result<String, GenieError> {
        let body = self
            .infer(
                &self.models.text_generation,
                json!(text),
                json!({ "max_length": self.generation_max_length, "return_full_text": true }),
            )
            .await?;
        parse_generation(body)
    }
}

/// Message of a failed call, using the `error` field of the body when there is one.
pub fn api_error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("error") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Array(messages)) => Some(
                messages
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<&str>>()
                    .join("; "),
            ),
            _ => None,
        })
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        format!("inference API returned {status}")
    } else {
        format!("inference API returned {status}: {detail}")
    }
}

fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, GenieError> {
    serde_json::from_value(body)
        .map_err(|error| GenieError::BackendError(format!("unexpected {what} response: {error}")))
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// `[{"summary_text": "..."}]`
pub fn parse_summary(body: Value) -> Result<String, GenieError> {
    decode::<Vec<SummaryItem>>(body, "summarization")?
        .into_iter()
        .next()
        .map(|item| item.summary_text)
        .ok_or_else(|| GenieError::BackendError("empty summarization response".to_string()))
}

#[derive(Deserialize)]
struct EntityItem {
    #[serde(alias = "entity")]
    entity_group: String,
    word: String,
    score: f64,
    start: Option<usize>,
    end: Option<usize>,
}

/// `[{"entity_group": "PER", "word": "Amy", "score": 0.99, "start": 11, "end": 14}]`.
/// Token level outputs using `entity` instead of `entity_group` are accepted as well.
pub fn parse_entities(body: Value) -> Result<Vec<EntitySpan>, GenieError> {
    Ok(decode::<Vec<EntityItem>>(body, "token classification")?
        .into_iter()
        .map(|item| EntitySpan {
            word: item.word,
            score: item.score,
            label: item.entity_group,
            start: item.start,
            end: item.end,
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SentimentResponse {
    Nested(Vec<Vec<SentimentScore>>),
    Flat(Vec<SentimentScore>),
}

/// `[[{"label": "POSITIVE", "score": 0.99}, ...]]` or `[{"label": ..., "score": ...}]`, returned
/// sorted by decreasing score.
pub fn parse_sentiment(body: Value) -> Result<Vec<SentimentScore>, GenieError> {
    let mut scores = match decode::<SentimentResponse>(body, "text classification")? {
        SentimentResponse::Nested(groups) => groups.into_iter().next().unwrap_or_default(),
        SentimentResponse::Flat(scores) => scores,
    };
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scores)
}

#[derive(Deserialize)]
struct AnswerItem {
    answer: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerResponse {
    Single(AnswerItem),
    Ranked(Vec<AnswerItem>),
}

/// `{"answer": "Paris", "score": 0.98, "start": 0, "end": 5}`
pub fn parse_answer(body: Value) -> Result<String, GenieError> {
    match decode::<AnswerResponse>(body, "question answering")? {
        AnswerResponse::Single(item) => Ok(item.answer),
        AnswerResponse::Ranked(items) => items
            .into_iter()
            .next()
            .map(|item| item.answer)
            .ok_or_else(|| GenieError::BackendError("no answer found".to_string())),
    }
}

#[derive(Deserialize)]
struct GenerationItem {
    generated_text: String,
}

/// `[{"generated_text": "..."}]`
pub fn parse_generation(body: Value) -> Result<String, GenieError> {
    decode::<Vec<GenerationItem>>(body, "text generation")?
        .into_iter()
        .next()
        .map(|item| item.generated_text)
        .ok_or_else(|| GenieError::BackendError("empty text generation response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model_id() {
        let config = GenieConfig {
            remote: crate::common::config::RemoteConfig {
                base_url: "http://localhost:9000/models/".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let backend = RemoteBackend::new(&config).unwrap();
        assert_eq!(backend.endpoint("gpt2"), "http://localhost:9000/models/gpt2");
    }

    #[test]
    fn summary() {
        let body = json!([{ "summary_text": "the planet has water. it is far away." }]);
        assert_eq!(
            parse_summary(body).unwrap(),
            "the planet has water. it is far away."
        );
        assert!(parse_summary(json!([])).is_err());
        assert!(matches!(
            parse_summary(json!({ "summary": "x" })),
            Err(GenieError::BackendError(_))
        ));
    }

    #[test]
    fn entities() {
        let body = json!([
            { "entity_group": "PER", "score": 0.998, "word": "Amy", "start": 11, "end": 14 },
            { "entity": "I-LOC", "score": 0.997, "word": "Paris", "index": 9, "start": 26, "end": 31 }
        ]);
        let entities = parse_entities(body).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, "PER");
        assert_eq!(entities[0].start, Some(11));
        assert_eq!(entities[1].label, "I-LOC");
        assert_eq!(entities[1].word, "Paris");

        assert!(parse_entities(json!([])).unwrap().is_empty());
        assert!(parse_entities(json!({ "error": "x" })).is_err());
    }

    #[test]
    fn sentiment_shapes() {
        let nested = json!([[
            { "label": "NEGATIVE", "score": 0.01 },
            { "label": "POSITIVE", "score": 0.99 }
        ]]);
        let scores = parse_sentiment(nested).unwrap();
        assert_eq!(scores[0].label, "POSITIVE");
        assert_eq!(scores.len(), 2);

        let flat = json!([{ "label": "NEGATIVE", "score": 0.9 }]);
        assert_eq!(parse_sentiment(flat).unwrap()[0].label, "NEGATIVE");

        assert!(parse_sentiment(json!([[]])).unwrap().is_empty());
        assert!(parse_sentiment(json!("POSITIVE")).is_err());
    }

    #[test]
    fn answer_shapes() {
        let single = json!({ "answer": "Paris", "score": 0.98, "start": 0, "end": 5 });
        assert_eq!(parse_answer(single).unwrap(), "Paris");
        let ranked = json!([{ "answer": "Paris", "score": 0.98 }, { "answer": "France", "score": 0.01 }]);
        assert_eq!(parse_answer(ranked).unwrap(), "Paris");
        assert!(parse_answer(json!([])).is_err());
    }

    #[test]
    fn generation() {
        let body = json!([{ "generated_text": "The dog barked at the mailman." }]);
        assert_eq!(
            parse_generation(body).unwrap(),
            "The dog barked at the mailman."
        );
        assert!(parse_generation(json!([{ "text": "x" }])).is_err());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            api_error_message(
                StatusCode::SERVICE_UNAVAILABLE,
                r#"{"error":"Model gpt2 is currently loading","estimated_time":20.0}"#
            ),
            "inference API returned 503 Service Unavailable: Model gpt2 is currently loading"
        );
        assert_eq!(
            api_error_message(StatusCode::BAD_REQUEST, r#"{"error":["a","b"]}"#),
            "inference API returned 400 Bad Request: a; b"
        );
        assert_eq!(
            api_error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "inference API returned 502 Bad Gateway: upstream down"
        );
        assert_eq!(
            api_error_message(StatusCode::UNAUTHORIZED, ""),
            "inference API returned 401 Unauthorized"
        );
    }
}
