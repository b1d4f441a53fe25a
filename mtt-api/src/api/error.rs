//! API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API errors, each carrying the user-facing message for its
/// `{"error": ...}` body
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required request field absent (400)
    #[error("{0}")]
    MissingField(String),

    /// Field present but out of range or of the wrong type (400)
    #[error("{0}")]
    InvalidValue(String),

    /// Referenced entity does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// Store or processing failure (500); the message is pre-gated by
    /// debug mode at the construction site
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingField(_) | ApiError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
