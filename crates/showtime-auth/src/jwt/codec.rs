//! Access and refresh keyspaces bundled together.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use showtime_core::clock::Clock;
use showtime_core::config::AuthConfig;

use super::claims::{Claims, TokenKind};
use super::decoder::JwtDecoder;
use super::encoder::{IssuedToken, JwtEncoder};
use super::error::TokenError;

/// The two credentials handed out on login and rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access credential.
    pub access: IssuedToken,
    /// Long-lived refresh credential.
    pub refresh: IssuedToken,
}

/// Wire view of an access credential for JSON bodies.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGrant {
    /// The access credential.
    pub access_token: String,
    /// When it expires.
    pub expires_at: DateTime<Utc>,
}

impl From<&TokenPair> for AccessGrant {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access.token.clone(),
            expires_at: pair.access.expires_at,
        }
    }
}

/// Issues and parses credentials in the access and refresh keyspaces.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    access_encoder: JwtEncoder,
    access_decoder: JwtDecoder,
    refresh_encoder: JwtEncoder,
    refresh_decoder: JwtDecoder,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Build both keyspaces from configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let access = config.jwt_access_secret.as_bytes();
        let refresh = config.jwt_refresh_secret.as_bytes();
        Self {
            access_encoder: JwtEncoder::new(access, Arc::clone(&clock)),
            access_decoder: JwtDecoder::new(access, Arc::clone(&clock)),
            refresh_encoder: JwtEncoder::new(refresh, Arc::clone(&clock)),
            refresh_decoder: JwtDecoder::new(refresh, clock),
            access_ttl: Duration::seconds(config.access_ttl_seconds()),
            refresh_ttl: Duration::seconds(config.refresh_ttl_seconds()),
        }
    }

    /// Lifetime of credentials of the given kind.
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue one credential in the keyspace of `kind`.
    pub fn issue(
        &self,
        kind: TokenKind,
        identity_id: u64,
        is_privileged: bool,
    ) -> Result<IssuedToken, TokenError> {
        let encoder = match kind {
            TokenKind::Access => &self.access_encoder,
            TokenKind::Refresh => &self.refresh_encoder,
        };
        encoder.issue(identity_id, is_privileged, kind, self.ttl(kind))
    }

    /// Issue an access and a refresh credential for one identity.
    pub fn issue_pair(&self, identity_id: u64, is_privileged: bool) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(TokenKind::Access, identity_id, is_privileged)?,
            refresh: self.issue(TokenKind::Refresh, identity_id, is_privileged)?,
        })
    }

    /// Parse a credential in the keyspace of `kind`.
    pub fn parse(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        match kind {
            TokenKind::Access => self.access_decoder.parse(token),
            TokenKind::Refresh => self.refresh_decoder.parse(token),
        }
    }
}
