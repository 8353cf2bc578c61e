//! Axum-specific error types and mappings.
//!
//! Maps grid and GeoJSON errors to HTTP status codes and JSON bodies of the
//! form `{ "error": ..., "status": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sds_core::{GeoJsonError, GridError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The grid has not been fetched yet.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Route exists but has no implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<GridError> for HttpError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Unavailable { .. } => Self::ServiceUnavailable(err.to_string()),
            GridError::NotFound(name) => Self::NotFound(format!("Unknown grid cell: {name}")),
            GridError::Parse(msg) => Self::Internal(format!("Grid: {msg}")),
            GridError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<GeoJsonError> for HttpError {
    fn from(err: GeoJsonError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
