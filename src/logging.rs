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

//! Console logging set-up.
//!
//! `RUST_LOG` takes precedence over the level picked from [`LoggingConfig::debug`].

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    /// Log at `debug` instead of `info` when `RUST_LOG` is not set
    pub debug: bool,
}

impl LoggingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|error| anyhow::anyhow!(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_debug_flag() {
        assert_eq!(LoggingConfig::default().default_directive(), "info");
        assert_eq!(LoggingConfig { debug: true }.default_directive(), "debug");
    }

    #[test]
    fn filter_uses_default_directive() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(LoggingConfig { debug: true }.filter().to_string(), "debug");
            assert_eq!(LoggingConfig::default().filter().to_string(), "info");
        }
    }
}
