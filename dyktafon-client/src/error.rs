//! Error types for the dyktafon client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the voice-note service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        status: u16,
        /// Error body returned by the service
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// Request could not be constructed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Whether the service reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Whether the error is a 4xx response
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (400..500).contains(status))
    }
}
