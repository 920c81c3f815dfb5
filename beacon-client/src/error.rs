//! Error types for the Beacon client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Beacon client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server refused the request for the current credentials
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The target instance is offline or detached
    #[error("Instance offline: {0}")]
    InstanceOffline(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means the user may not see the resource
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// Check if this error means the instance went offline
    pub fn is_instance_offline(&self) -> bool {
        matches!(self, Self::InstanceOffline(_))
    }
}
