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

//! # Inference backends
//! The pretrained pipelines are external collaborators reached through [`NlpBackend`]. Two
//! implementations are available, selected by [`BackendKind`]:
//! - `local` (cargo feature `local`): rust-bert models loaded in-process, one long-lived
//!   [`worker::ModelWorker`] per task
//! - `remote` (cargo feature `remote`, default): the Hugging Face Inference API over HTTP

use crate::common::config::{BackendKind, GenieConfig};
use crate::common::error::GenieError;
use crate::pipelines::ner::EntitySpan;
use crate::pipelines::sentiment::SentimentScore;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "remote")]
pub mod remote;
pub mod worker;

/// Contracts of the five pretrained pipelines.
///
/// Every call may be slow (model load and inference) and fallible. Implementations must not
/// panic on malformed input, failures are reported as `Err`.
#[async_trait]
pub trait NlpBackend: Send + Sync {
    /// Short name used in logs and in the health endpoint
    fn name(&self) -> &str;

    /// Summary of `text`, between `min_length` and `max_length` tokens.
    async fn summarize(
        &self,
        text: &str,
        min_length: i64,
        max_length: i64,
    ) -> Result<String, GenieError>;

    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, GenieError>;

    /// Sentiment predictions, most likely first.
    async fn classify_sentiment(&self, text: &str) -> Result<Vec<SentimentScore>, GenieError>;

    async fn answer_question(&self, question: &str, context: &str) -> Result<String, GenieError>;

    /// Continuation of `text`, prompt included.
    async fn complete_text(&self, text: &str) -> Result<String, GenieError>;

    /// Acquires every model handle ahead of the first request.
    async fn warm_up(&self) -> Result<(), GenieError> {
        Ok(())
    }
}

/// Builds the backend selected in the configuration.
pub fn create_backend(config: &GenieConfig) -> Result<Arc<dyn NlpBackend>, GenieError> {
    match config.backend {
        BackendKind::Local => create_local(config),
        BackendKind::Remote => create_remote(config),
    }
}

#[cfg(feature = "local")]
fn create_local(config: &GenieConfig) -> Result<Arc<dyn NlpBackend>, GenieError> {
    Ok(Arc::new(local::LocalBackend::new(config)))
}

#[cfg(not(feature = "local"))]
fn create_local(_config: &GenieConfig) -> Result<Arc<dyn NlpBackend>, GenieError> {
    Err(GenieError::InvalidConfigurationError(
        "the `local` backend requires building with the `local` feature".to_string(),
    ))
}

#[cfg(feature = "remote")]
fn create_remote(config: &GenieConfig) -> Result<Arc<dyn NlpBackend>, GenieError> {
    Ok(Arc::new(remote::RemoteBackend::new(config)?))
}

#[cfg(not(feature = "remote"))]
fn create_remote(_config: &GenieConfig) -> Result<Arc<dyn NlpBackend>, GenieError> {
    Err(GenieError::InvalidConfigurationError(
        "the `remote` backend requires building with the `remote` feature".to_string(),
    ))
}
