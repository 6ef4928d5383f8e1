//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use showtime_auth::{Claims, LoginSummary, TokenPair};

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response. The refresh credential only travels in its cookie.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated identity.
    pub user: LoginSummary,
    /// Access credential.
    pub access_token: String,
    /// Access credential expiration.
    pub expires_at: DateTime<Utc>,
}

impl LoginResponse {
    /// Assemble from the login summary and the issued pair.
    pub fn new(user: LoginSummary, tokens: &TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access.token.clone(),
            expires_at: tokens.access.expires_at,
        }
    }
}

/// The identity attached to the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Identity key.
    pub id: u64,
    /// Administrative privilege.
    pub is_admin: bool,
    /// When the presented access credential expires.
    pub expires_at: DateTime<Utc>,
}

impl From<&Claims> for SessionInfo {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.id,
            is_admin: claims.is_admin,
            expires_at: claims.expires_at(),
        }
    }
}

/// Result of an administrative session revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    /// Identity whose session was targeted.
    pub user_id: u64,
    /// Whether a live session existed.
    pub revoked: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}
