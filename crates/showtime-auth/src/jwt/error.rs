//! Credential codec failures.

use thiserror::Error;

use showtime_core::error::AppError;

/// Why a credential could not be issued or accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not verify under the keyspace's secret.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The header names an algorithm outside the HMAC family.
    #[error("unsupported signing algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    /// The credential is past its expiry.
    #[error("token expired")]
    Expired,
    /// The credential is not a well-formed compact token.
    #[error("malformed token")]
    Malformed,
    /// The signer is misconfigured.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::signing_failure(err.to_string()),
            other => AppError::invalid_credential(other.to_string()),
        }
    }
}
