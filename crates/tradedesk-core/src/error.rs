//! Unified application error types for TradeDesk.
//!
//! Every crate maps its internal failures into [`AppError`] so that callers
//! only ever match on an [`ErrorKind`] and, for REST failures, the HTTP status
//! that produced it.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// The session credential was rejected (HTTP 401).
    Authentication,
    /// The caller lacks permission for the resource (HTTP 403).
    Authorization,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The network transport (HTTP or push channel) failed.
    Transport,
    /// The backend answered with an unexpected non-success status.
    ExternalService,
    /// An optimistic local update was rolled back after the server rejected it.
    Rollback,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Rollback => write!(f, "ROLLBACK"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout TradeDesk.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// HTTP status that produced this error, when it came from a REST call.
    pub status: Option<u16>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Map a non-success HTTP status onto an error kind, keeping the status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            _ => ErrorKind::ExternalService,
        };
        Self {
            kind,
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Whether this error means the session credential is invalid (401/403).
    ///
    /// These are the only failures the cache and realtime client propagate
    /// instead of treating them as transient or as "not found".
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, Some(401 | 403))
            || matches!(self.kind, ErrorKind::Authentication | ErrorKind::Authorization)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Wrap a failed acknowledgement whose optimistic update was undone.
    ///
    /// Kind becomes [`ErrorKind::Rollback`]; the original status is kept so
    /// callers can still tell an expired session apart.
    pub fn rolled_back(cause: AppError) -> Self {
        Self {
            kind: ErrorKind::Rollback,
            message: format!("mark-read was not applied: {}", cause.message),
            status: cause.status,
            source: Some(Box::new(cause)),
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            status: self.status,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Invalid URL: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
