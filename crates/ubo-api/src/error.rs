//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps core load and render errors to HTTP status codes with JSON bodies.
//! Internal error details are never exposed; data-integrity faults are,
//! since the message names the country, category and value to fix.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use ubo_core::RenderError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "DATA_INTEGRITY").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request was well formed but refers to something that does not exist (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or event could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A category cannot be rendered because the dataset holds a value
    /// its registry entry does not map (500).
    #[error("data integrity fault: {0}")]
    DataIntegrity(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::DataIntegrity(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Render errors on path routes: an out-of-range index is a missing resource.
    pub fn for_path(err: RenderError) -> Self {
        match err {
            RenderError::CategoryOutOfRange { .. } => Self::NotFound(err.to_string()),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::DataIntegrity(_) => tracing::error!(error = %self, "render failed"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert core render errors to API errors.
impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match &err {
            RenderError::UnknownStatus { .. } | RenderError::MissingValue { .. } => {
                Self::DataIntegrity(err.to_string())
            }
            RenderError::CategoryOutOfRange { .. } => Self::Validation(err.to_string()),
            RenderError::MalformedEvent(_) => Self::BadRequest(err.to_string()),
        }
    }
}
