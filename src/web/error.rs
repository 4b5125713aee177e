// Typed handler errors and how each one maps onto an HTTP response.
//
// Scoring never appears here: scorers absorb upstream failures themselves.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::api_error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Multipart body couldn't be read (includes "body too large")
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// Detection store or upload directory failure
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),

    /// Feedback payload rejected or feedback log unwritable
    #[error("{0:#}")]
    Feedback(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => api_error(StatusCode::BAD_REQUEST, &message),
            ApiError::Multipart(e) => api_error(e.status(), &e.body_text()),
            ApiError::Storage(e) => {
                error!(error = %format!("{e:#}"), "Storage error");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            ApiError::Feedback(e) => {
                let message = format!("{e:#}");
                error!(error = %message, "Failed to save feedback");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "status": "error", "message": message })),
                )
                    .into_response()
            }
        }
    }
}
