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

//! # Web front-end
//! The HTML page and the JSON API share the same [`Dispatcher`]:
//!
//! | Route | |
//! |---|---|
//! | `GET /?task=<slug>` | page with the form of the selected task |
//! | `POST /` | runs the submitted form and renders the result |
//! | `GET /health` | liveness and backend name |
//! | `GET /api/tasks` | selectable tasks with their fields |
//! | `POST /api/dispatch` | runs a JSON request, returns the serialized outcome |

use crate::dispatcher::Dispatcher;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod render;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{run_server, ServerConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Builds the application router with its tracing and panic layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::submit))
        .route("/health", get(routes::health))
        .route("/api/tasks", get(routes::tasks))
        .route("/api/dispatch", post(routes::dispatch))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|message| message.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());
    ApiError::Internal(message).into_response()
}
