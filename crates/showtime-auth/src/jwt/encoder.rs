//! Credential issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use showtime_core::clock::Clock;

use super::claims::{Claims, TokenKind};
use super::error::TokenError;

/// A freshly signed credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialized credential.
    pub token: String,
    /// When the credential stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs credentials with one HMAC secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    has_secret: bool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("has_secret", &self.has_secret)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder for the given secret.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            has_secret: !secret.is_empty(),
            clock,
        }
    }

    /// Signs claims for `identity_id` valid for `ttl` from now.
    ///
    /// Fails only when the signer is misconfigured.
    pub fn issue(
        &self,
        identity_id: u64,
        is_privileged: bool,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        if !self.has_secret {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        let now = self.clock.now();
        let expires_at = now + ttl;
        let claims = Claims {
            id: identity_id,
            is_admin: is_privileged,
            sub: kind.subject(identity_id),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
