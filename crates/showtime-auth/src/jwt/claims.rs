//! Claims carried by access and refresh credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity key.
    pub id: u64,
    /// Administrative privilege at issuance time.
    pub is_admin: bool,
    /// Subject tag: `access:<id>` or `refresh:<id>`.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Per-credential nonce.
    pub jti: Uuid,
}

impl Claims {
    /// The credential kind named by the subject tag, if well formed.
    pub fn kind(&self) -> Option<TokenKind> {
        let (prefix, id) = self.sub.split_once(':')?;
        if id.parse::<u64>().ok()? != self.id {
            return None;
        }
        TokenKind::from_prefix(prefix)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Whether the credential is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }
}

/// Distinguishes access credentials from refresh credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived credential for API requests.
    Access,
    /// Long-lived credential for obtaining new access credentials.
    Refresh,
}

impl TokenKind {
    /// The prefix used in subject tags.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Build the subject tag for an identity.
    pub fn subject(self, identity_id: u64) -> String {
        format!("{}:{identity_id}", self.prefix())
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "access" => Some(Self::Access),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}
