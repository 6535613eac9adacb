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

use crate::common::config::GenieConfig;
use crate::common::error::GenieError;
use crate::dispatcher::Dispatcher;
use crate::web::{router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Load every model before binding the listener
    pub preload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            preload: false,
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &GenieConfig) -> ServerConfig {
        ServerConfig {
            bind_addr: config.bind_addr,
            preload: config.preload,
        }
    }
}

/// Serves the application until Ctrl+C or SIGTERM.
pub async fn run_server(dispatcher: Dispatcher, config: ServerConfig) -> Result<(), GenieError> {
    if config.preload {
        tracing::info!(backend = dispatcher.backend_name(), "preloading models");
        dispatcher.warm_up().await?;
    }
    let app = router(AppState { dispatcher });

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("NLP Genie listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_follows_genie_config() {
        assert_eq!(ServerConfig::default().bind_addr.port(), 8501);
        let config = GenieConfig {
            preload: true,
            ..Default::default()
        };
        let server = ServerConfig::from_config(&config);
        assert!(server.preload);
        assert_eq!(server.bind_addr, config.bind_addr);
    }
}
