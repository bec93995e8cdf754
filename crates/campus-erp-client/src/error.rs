//! Client error types.

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unknown resource `{0}`")]
    UnknownResource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
