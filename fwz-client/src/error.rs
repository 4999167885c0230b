//! Client error types

use shared::error::ErrorCategory;
use thiserror::Error;

/// Client error type
///
/// Only transport-level failures live here; a `success=false` envelope is a
/// normal return value.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status without a parseable envelope
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request parameters could not be encoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Transport
    }

    /// The request never produced a usable answer (as opposed to a local
    /// encoding mistake)
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_) | Self::Serialization(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
