//! Unified application error types for Showtime.
//!
//! Every crate maps its internal failures into [`AppError`] so that the
//! HTTP layer can translate them into responses in one place.

use std::fmt;
use thiserror::Error;

/// Error categories surfaced by the authentication and admission core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed request body or missing fields.
    InvalidInput,
    /// The email address failed format checks.
    InvalidEmail,
    /// The password failed strength checks.
    WeakPassword,
    /// Unknown identity or wrong secret. Deliberately uninformative.
    InvalidCredentials,
    /// No credential was presented on a protected route.
    MissingCredential,
    /// A presented credential could not be parsed or verified.
    InvalidCredential,
    /// A superseded refresh credential was replayed.
    SessionCompromised,
    /// The identity lacks the privilege required by the route.
    Forbidden,
    /// A unique record already exists.
    Conflict,
    /// The client exhausted its admission budget.
    RateLimited,
    /// A credential could not be signed.
    SigningFailure,
    /// The external record store failed.
    Persistence,
    /// Configuration could not be loaded or is inconsistent.
    Configuration,
    /// Anything else that should surface as a server error.
    Internal,
}

impl ErrorKind {
    /// Whether the kind is a server-side fault whose detail must stay private.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            Self::SigningFailure | Self::Persistence | Self::Configuration | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
            Self::InvalidEmail => write!(f, "INVALID_EMAIL"),
            Self::WeakPassword => write!(f, "WEAK_PASSWORD"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::MissingCredential => write!(f, "MISSING_CREDENTIAL"),
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::SessionCompromised => write!(f, "SESSION_COMPROMISED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::SigningFailure => write!(f, "SIGNING_FAILURE"),
            Self::Persistence => write!(f, "PERSISTENCE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Showtime.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
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
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create an invalid-email error.
    pub fn invalid_email(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEmail, message)
    }

    /// Create a weak-password error.
    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WeakPassword, message)
    }

    /// The single generic login failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create a missing-credential error.
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredential, message)
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// The refresh-reuse failure.
    pub fn session_compromised() -> Self {
        Self::new(
            ErrorKind::SessionCompromised,
            "Session revoked, please sign in again",
        )
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a signing-failure error.
    pub fn signing_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SigningFailure, message)
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Persistence, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
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
