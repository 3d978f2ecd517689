//! Custom error types for roverpool

use std::fmt;

/// Main error type for roverpool operations
#[derive(Debug)]
pub enum PanelError {
    /// The request never completed (connection refused, timeout, DNS...)
    Transport(String),
    /// Non-success HTTP status carrying an `error` message in the body
    Service { status: u16, message: String },
    /// Non-success HTTP status without a usable `error` message
    UnknownService { status: u16, fallback: String },
    /// Success status, but the body could not be decoded
    InvalidResponse(String),
    /// Configuration related errors
    Config(String),
    /// Terminal dashboard errors
    Tui(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl PanelError {
    /// HTTP status reported by the service, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            PanelError::Service { status, .. } | PanelError::UnknownService { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// The service's own error text, when it sent one
    pub fn service_message(&self) -> Option<&str> {
        match self {
            PanelError::Service { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, PanelError::Transport(_))
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Transport(msg) => write!(f, "Connection error: {}", msg),
            PanelError::Service { message, .. } => write!(f, "{}", message),
            PanelError::UnknownService { fallback, .. } => write!(f, "{}", fallback),
            PanelError::InvalidResponse(msg) => write!(f, "Invalid server response: {}", msg),
            PanelError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PanelError::Tui(msg) => write!(f, "TUI error: {}", msg),
            PanelError::Io(err) => write!(f, "I/O error: {}", err),
            PanelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Io(err)
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        PanelError::Config(err.to_string())
    }
}

/// Result type alias for roverpool operations
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_is_shown_verbatim() {
        let err = PanelError::Service {
            status: 500,
            message: "receiver unreachable".to_string(),
        };
        assert_eq!(err.to_string(), "receiver unreachable");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.service_message(), Some("receiver unreachable"));
    }

    #[test]
    fn test_unknown_service_error_uses_fallback() {
        let err = PanelError::UnknownService {
            status: 502,
            fallback: "Failed to start session".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to start session");
        assert!(err.service_message().is_none());
    }

    #[test]
    fn test_transport_error_prefix() {
        let err = PanelError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Connection error: connection refused");
        assert!(err.is_transport());
        assert!(err.status().is_none());
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;
        let err: PanelError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
