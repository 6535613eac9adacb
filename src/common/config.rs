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

use crate::common::error::GenieError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// # Utility to deserialize JSON config files
pub trait Config
where
    for<'de> Self: Deserialize<'de>,
{
    /// Loads a `Config` object from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - `Path` to the configuration JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nlp_genie::common::config::{Config, GenieConfig};
    /// use std::path::Path;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config_path = Path::new("path/to/config.json");
    /// let config = GenieConfig::from_file(config_path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenieError> {
        let f = File::open(path)?;
        let br = BufReader::new(f);
        let config: Self = serde_json::from_reader(br)?;
        Ok(config)
    }
}

/// Which implementation of the model pipelines to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// rust-bert pipelines running in-process (requires the `local` feature)
    Local,
    /// Hugging Face Inference API over HTTP (requires the `remote` feature)
    #[default]
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(GenieError::InvalidConfigurationError(format!(
                "unknown backend `{other}` (expected `local` or `remote`)"
            ))),
        }
    }
}

/// Model identifiers used by the remote backend, one per task.
///
/// Defaults follow the reference pipelines of the Hugging Face hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelIds {
    pub summarization: String,
    pub ner: String,
    pub sentiment: String,
    pub question_answering: String,
    pub text_generation: String,
}

impl Default for ModelIds {
    fn default() -> ModelIds {
        ModelIds {
            summarization: "sshleifer/distilbart-cnn-12-6".to_string(),
            ner: "dbmdz/bert-large-cased-finetuned-conll03-english".to_string(),
            sentiment: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            question_answering: "distilbert-base-cased-distilled-squad".to_string(),
            text_generation: "gpt2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL the model id is appended to
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Request timeout in seconds. `None` waits for as long as the model takes.
    pub timeout_secs: Option<u64>,
    pub models: ModelIds,
}

impl Default for RemoteConfig {
    fn default() -> RemoteConfig {
        RemoteConfig {
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            api_token: None,
            timeout_secs: None,
            models: ModelIds::default(),
        }
    }
}

/// # Application configuration
///
/// Every field has a default, so a configuration file only needs to list the values it changes:
///
/// ```json
/// { "backend": "local", "preload": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenieConfig {
    /// Address the web server binds to (default: 127.0.0.1:8501)
    pub bind_addr: SocketAddr,
    /// Pipeline implementation (default: remote)
    pub backend: BackendKind,
    /// Load every model before accepting requests (default: false)
    pub preload: bool,
    /// Run local models on CUDA when a device is available (default: true)
    pub use_cuda: bool,
    /// Upper bound on the summary length, in tokens (default: 50)
    pub summary_max_length: i64,
    /// Upper bound on the completed text length, in tokens (default: 50)
    pub generation_max_length: i64,
    pub remote: RemoteConfig,
}

impl Default for GenieConfig {
    fn default() -> GenieConfig {
        GenieConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            backend: BackendKind::default(),
            preload: false,
            use_cuda: true,
            summary_max_length: 50,
            generation_max_length: 50,
            remote: RemoteConfig::default(),
        }
    }
}

impl Config for GenieConfig {}

impl GenieConfig {
    /// Location searched when no configuration file is given explicitly:
    /// `<config dir>/nlp-genie/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("nlp-genie");
            path.push("config.json");
            path
        })
    }

    /// Loads the configuration from `path` if given, else from the default location if that
    /// file exists, else falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<GenieConfig, GenieError> {
        match path {
            Some(path) => GenieConfig::from_file(path),
            None => match GenieConfig::default_path() {
                Some(path) if path.is_file() => GenieConfig::from_file(path),
                _ => Ok(GenieConfig::default()),
            },
        }
    }

    pub fn validate(&self) -> Result<(), GenieError> {
        if self.summary_max_length <= 0 {
            return Err(GenieError::InvalidConfigurationError(format!(
                "summary_max_length must be positive, got {}",
                self.summary_max_length
            )));
        }
        if self.generation_max_length <= 0 {
            return Err(GenieError::InvalidConfigurationError(format!(
                "generation_max_length must be positive, got {}",
                self.generation_max_length
            )));
        }
        if self.remote.base_url.trim().is_empty() {
            return Err(GenieError::InvalidConfigurationError(
                "remote.base_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
