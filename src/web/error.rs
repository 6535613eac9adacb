//! JSON API errors, converted to responses with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Selection slug outside of the menu (400)
    #[error("unknown selection '{0}'")]
    UnknownSelection(String),

    /// The backend failed to run the task (502)
    #[error("{message}")]
    Inference { selection: String, message: String },

    /// Internal error (500, logged)
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::UnknownSelection(slug) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "unknown_selection",
                    "message": format!("unknown selection '{slug}'")
                }),
            ),
            Self::Inference { selection, message } => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": "inference_error",
                    "selection": selection,
                    "message": message
                }),
            ),
            Self::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
