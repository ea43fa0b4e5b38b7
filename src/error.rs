//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure that still produced a reqwest error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend could not be reached (browser status 0)
    #[error("Network unreachable: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        /// Message extracted from the structured error body, if any
        message: Option<String>,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status of the failure, `0` when the backend was unreachable.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) => Some(0),
            Self::Http(e) if e.is_connect() || e.is_timeout() => Some(0),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the request never reached the backend.
    pub fn is_network(&self) -> bool {
        self.status() == Some(0)
    }

    /// Message supplied by the backend in its error body.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: backend message verbatim, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => self.backend_message().unwrap_or(fallback).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_is_status_zero() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.status(), Some(0));
        assert!(err.is_network());
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = AppError::Status {
            status: 400,
            message: Some("El correo ya existe".to_string()),
        };
        assert_eq!(err.user_message("Error genérico"), "El correo ya existe");
        assert!(!err.is_network());
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = AppError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Error genérico"), "Error genérico");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_validation_message_is_shown_as_is() {
        let err = AppError::validation("Horario inválido");
        assert_eq!(err.user_message("x"), "Horario inválido");
        assert_eq!(err.status(), None);
    }
}
