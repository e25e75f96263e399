//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Remote Error Enum ==
/// Failure reported by a remote tier adapter.
///
/// The cache manager never propagates these; they are logged and the
/// call degrades to local-tier behaviour.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Could not establish a connection to the remote service
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The remote service rejected or failed a command
    #[error("Command failed: {0}")]
    Command(String),

    /// The remote call did not complete in time
    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    /// The remote service is currently unreachable
    #[error("Remote tier unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for RemoteError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() {
            RemoteError::Connection(err.to_string())
        } else if err.is_timeout() {
            RemoteError::Command(format!("timeout: {}", err))
        } else {
            RemoteError::Command(err.to_string())
        }
    }
}

// == Cache Error Enum ==
/// Error type for the HTTP admin surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in either tier
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for API handlers.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by remote tier adapters.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
