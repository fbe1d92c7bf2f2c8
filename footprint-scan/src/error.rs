//! Error types for footprint-scan
//!
//! Signal failures never surface here: they degrade a single signal to zero.
//! Connector failures are isolated inside the registry. What remains is
//! request validation and whole-pipeline failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Scan pipeline error
#[derive(Debug, Error)]
pub enum ScanError {
    /// Query carries no identifying field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected failure while assembling the report
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Validation(msg) => ApiError::BadRequest(msg),
            ScanError::Pipeline(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
