//! Error types for the protection layer
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses, expired entries and limiter rejections are ordinary return
//! values, not errors; the variants here cover caller-input mistakes and the
//! HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Backstop Error Enum ==
/// Unified error type for the protection layer and its HTTP facade.
#[derive(Error, Debug)]
pub enum BackstopError {
    /// Key not found in cache (HTTP boundary only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalidation pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Construction-time parameter was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for BackstopError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            BackstopError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            BackstopError::InvalidPattern(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            BackstopError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            BackstopError::InvalidConfig(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the protection layer.
pub type Result<T> = std::result::Result<T, BackstopError>;
