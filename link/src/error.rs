//! Error types for fms-link.

/// Result type for fms-link operations
pub type Result<T> = std::result::Result<T, FmsLinkError>;

/// Errors produced by the bridge, the typed client and the session store.
#[derive(Debug, thiserror::Error)]
pub enum FmsLinkError {
    /// The script request could not be loaded (connection failure, non-2xx status).
    #[error("Script loading failed: {0}")]
    NetworkError(String),

    /// No callback invocation arrived before the deadline.
    #[error("Request timeout: {0}")]
    TimeoutError(String),

    /// HTTP-level rejection carrying a status code.
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// The endpoint answered with `success: false`.
    #[error("{0}")]
    RemoteError(String),

    /// Login was refused or produced an unusable user.
    #[error("{0}")]
    AuthenticationError(String),

    /// The response was not a callback invocation the bridge can accept.
    #[error("Invalid response from server: {0}")]
    ProtocolError(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Client construction or URL problems.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Durable session storage failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A form failed local validation before submission.
    #[error("{0}")]
    ValidationError(String),
}

impl FmsLinkError {
    /// Whether the failure happened in transport (load failure or timeout)
    /// rather than being reported by the remote service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FmsLinkError::NetworkError(_)
                | FmsLinkError::TimeoutError(_)
                | FmsLinkError::ServerError { .. }
        )
    }
}

impl From<reqwest::Error> for FmsLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FmsLinkError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            FmsLinkError::ProtocolError(err.to_string())
        } else {
            FmsLinkError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FmsLinkError {
    fn from(err: serde_json::Error) -> Self {
        FmsLinkError::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for FmsLinkError {
    fn from(err: url::ParseError) -> Self {
        FmsLinkError::ConfigurationError(format!("invalid URL: {}", err))
    }
}
