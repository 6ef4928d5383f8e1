//! Security audit events.

use serde::{Deserialize, Serialize};

/// A security-relevant occurrence worth recording.
///
/// Serialized with an `event_type` tag so sinks can forward events to a
/// log pipeline without further mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEvent {
    /// Credentials were accepted.
    LoginSuccess {
        /// Authenticated identity.
        user_id: u64,
        /// Normalized email.
        email: String,
        /// Client key of the caller.
        client: String,
    },
    /// Credentials were rejected.
    LoginFailure {
        /// Email as presented.
        email: String,
        /// Client key of the caller.
        client: String,
        /// Internal reason, never shown to the caller.
        reason: String,
    },
    /// A registration attempt completed or was refused.
    Registration {
        /// Normalized email.
        email: String,
        /// Client key of the caller.
        client: String,
        /// Whether a new identity was created.
        created: bool,
    },
    /// A session was revoked by its holder.
    Logout {
        /// Identity whose session ended.
        user_id: u64,
        /// Client key of the caller.
        client: String,
    },
    /// A session was revoked by an administrator.
    SessionRevoked {
        /// Identity whose session ended.
        user_id: u64,
        /// Administrator who revoked it.
        revoked_by: u64,
    },
    /// A client exhausted its admission budget.
    RateLimitExceeded {
        /// Limiter class that rejected the request.
        class: String,
        /// Client key that was throttled.
        client: String,
        /// Request path.
        path: String,
    },
    /// A superseded refresh credential was replayed.
    SuspiciousActivity {
        /// Identity whose sessions were revoked.
        user_id: u64,
        /// Client key of the caller.
        client: String,
        /// What was detected.
        detail: String,
    },
    /// An identity attempted a route it lacks privilege for.
    UnauthorizedAccess {
        /// Identity that was refused.
        user_id: u64,
        /// Request path.
        resource: String,
        /// Client key of the caller.
        client: String,
    },
}

impl SecurityEvent {
    /// The wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LoginSuccess { .. } => "LOGIN_SUCCESS",
            Self::LoginFailure { .. } => "LOGIN_FAILURE",
            Self::Registration { .. } => "REGISTRATION",
            Self::Logout { .. } => "LOGOUT",
            Self::SessionRevoked { .. } => "SESSION_REVOKED",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::SuspiciousActivity { .. } => "SUSPICIOUS_ACTIVITY",
            Self::UnauthorizedAccess { .. } => "UNAUTHORIZED_ACCESS",
        }
    }

    /// Whether the event indicates a failure or an attack signal.
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Self::LoginFailure { .. }
                | Self::RateLimitExceeded { .. }
                | Self::SuspiciousActivity { .. }
                | Self::UnauthorizedAccess { .. }
        )
    }
}
