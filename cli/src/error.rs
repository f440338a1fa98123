//! Error types for fms-cli
//!
//! Provides user-facing messages for the failures a terminal session can hit.

use fms_link::FmsLinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CLIError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CLIError {
    /// Error from fms-link library
    LinkError(FmsLinkError),

    /// Configuration file or startup argument error
    ConfigurationError(String),

    /// File I/O error
    FileError(String),

    /// Invalid shell command syntax
    ParseError(String),

    /// Command needs a logged-in user
    NotLoggedIn,

    /// Page action refused or failed; the message is shown as-is
    ActionFailed(String),

    /// User cancelled operation
    Cancelled,

    /// Readline error
    ReadlineError(String),

    /// History file error
    HistoryError(String),

    /// Format error
    FormatError(String),
}

impl CLIError {
    fn format_link_error(err: &FmsLinkError) -> String {
        match err {
            FmsLinkError::RemoteError(msg)
            | FmsLinkError::AuthenticationError(msg)
            | FmsLinkError::ValidationError(msg) => msg.clone(),
            FmsLinkError::ConfigurationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error came from the transport rather than the endpoint or the user.
    pub fn is_transport(&self) -> bool {
        matches!(self, CLIError::LinkError(e) if e.is_transport())
    }
}

impl fmt::Display for CLIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLIError::LinkError(e) => write!(f, "{}", Self::format_link_error(e)),
            CLIError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CLIError::FileError(msg) => write!(f, "File error: {}", msg),
            CLIError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CLIError::NotLoggedIn => write!(f, "Not logged in. Use --login or the login prompt."),
            CLIError::ActionFailed(msg) => write!(f, "{}", msg),
            CLIError::Cancelled => write!(f, "Operation cancelled"),
            CLIError::ReadlineError(msg) => write!(f, "Input error: {}", msg),
            CLIError::HistoryError(msg) => write!(f, "History error: {}", msg),
            CLIError::FormatError(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for CLIError {}

impl From<FmsLinkError> for CLIError {
    fn from(err: FmsLinkError) -> Self {
        CLIError::LinkError(err)
    }
}

impl From<rustyline::error::ReadlineError> for CLIError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Interrupted => CLIError::Cancelled,
            rustyline::error::ReadlineError::Eof => CLIError::Cancelled,
            e => CLIError::ReadlineError(e.to_string()),
        }
    }
}

impl From<std::io::Error> for CLIError {
    fn from(err: std::io::Error) -> Self {
        CLIError::FileError(err.to_string())
    }
}

impl From<toml::de::Error> for CLIError {
    fn from(err: toml::de::Error) -> Self {
        CLIError::ConfigurationError(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for CLIError {
    fn from(err: serde_json::Error) -> Self {
        CLIError::FormatError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CLIError::ParseError("Unknown command 'frobnicate'".into());
        assert_eq!(err.to_string(), "Parse error: Unknown command 'frobnicate'");

        let err = CLIError::Cancelled;
        assert_eq!(err.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_link_errors_show_server_message() {
        let err: CLIError = FmsLinkError::RemoteError("Row locked".into()).into();
        assert_eq!(err.to_string(), "Row locked");
        assert!(!err.is_transport());

        let err: CLIError = FmsLinkError::TimeoutError("no response within 30s".into()).into();
        assert_eq!(err.to_string(), "Request timeout: no response within 30s");
        assert!(err.is_transport());
    }
}
