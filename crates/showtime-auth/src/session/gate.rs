//! Protect and rotate gates.
//!
//! Each request moves `Unauthenticated → AccessValidated → Attached` or
//! ends in `Rejected`. The gates here are transport-agnostic: the HTTP
//! layer extracts carriers and attaches the returned claims.

use std::sync::Arc;

use tracing::{info, warn};

use showtime_core::error::AppError;
use showtime_core::events::SecurityEvent;
use showtime_core::traits::AuditSink;

use crate::jwt::{Claims, TokenCodec, TokenError, TokenKind, TokenPair};

use super::store::{RotationOutcome, SessionStore};

/// Outcome of a successful rotation.
#[derive(Debug, Clone)]
pub struct RotatedSession {
    /// Identity the session belongs to.
    pub identity_id: u64,
    /// The newly minted pair. The refresh half is now the live entry.
    pub tokens: TokenPair,
}

/// Validates access credentials and rotates refresh credentials.
#[derive(Debug, Clone)]
pub struct SessionGate {
    codec: Arc<TokenCodec>,
    store: Arc<SessionStore>,
    audit: Arc<dyn AuditSink>,
}

impl SessionGate {
    /// Build a gate over the shared codec and store.
    pub fn new(codec: Arc<TokenCodec>, store: Arc<SessionStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            codec,
            store,
            audit,
        }
    }

    /// Protect gate: parse the presented access credential.
    pub fn protect(&self, credential: Option<&str>) -> Result<Claims, AppError> {
        let token = present(credential, "Access token required")?;
        self.parse(TokenKind::Access, token)
    }

    /// Rotate gate: exchange a live refresh credential for a new pair.
    ///
    /// A credential that parses but is not the identity's live entry is
    /// treated as a replay: the entry is deleted and the call fails with
    /// `SessionCompromised`.
    pub async fn rotate(
        &self,
        credential: Option<&str>,
        client: &str,
    ) -> Result<RotatedSession, AppError> {
        let token = present(credential, "Refresh token required")?;
        let claims = self.parse(TokenKind::Refresh, token)?;
        let identity_id = claims.id;

        let mut minted: Option<TokenPair> = None;
        let outcome = self
            .store
            .rotate(identity_id, token, || {
                let pair = self.codec.issue_pair(identity_id, claims.is_admin)?;
                let refresh = pair.refresh.token.clone();
                minted = Some(pair);
                Ok::<_, TokenError>(refresh)
            })
            .await?;

        match (outcome, minted) {
            (RotationOutcome::Rotated, Some(tokens)) => {
                info!(user_id = identity_id, "Session rotated");
                Ok(RotatedSession {
                    identity_id,
                    tokens,
                })
            }
            (RotationOutcome::Rotated, None) => {
                Err(AppError::internal("Rotation completed without new credentials"))
            }
            (RotationOutcome::ReuseDetected, _) => {
                warn!(
                    user_id = identity_id,
                    client = %client,
                    "Refresh token reuse detected, sessions revoked"
                );
                self.audit.record(SecurityEvent::SuspiciousActivity {
                    user_id: identity_id,
                    client: client.to_string(),
                    detail: "refresh token reuse detected".to_string(),
                });
                Err(AppError::session_compromised())
            }
        }
    }

    fn parse(&self, kind: TokenKind, token: &str) -> Result<Claims, AppError> {
        let claims = self
            .codec
            .parse(kind, token)
            .map_err(|e| AppError::invalid_credential(format!("Invalid {} token: {e}", kind.prefix())))?;

        if claims.kind() != Some(kind) {
            return Err(AppError::invalid_credential(format!(
                "Expected {} token",
                kind.prefix()
            )));
        }
        Ok(claims)
    }
}

fn present<'a>(credential: Option<&'a str>, missing: &str) -> Result<&'a str, AppError> {
    match credential.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::missing_credential(missing)),
    }
}

#[cfg(test)]
mod tests {
    use showtime_core::clock::ManualClock;
    use showtime_core::config::AuthConfig;
    use showtime_core::error::ErrorKind;
    use showtime_core::traits::MemoryAuditSink;

    use super::*;

    struct Fixture {
        gate: SessionGate,
        codec: Arc<TokenCodec>,
        store: Arc<SessionStore>,
        audit: Arc<MemoryAuditSink>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = Arc::new(TokenCodec::new(&AuthConfig::default(), clock));
        let store = Arc::new(SessionStore::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let gate = SessionGate::new(Arc::clone(&codec), Arc::clone(&store), audit.clone());
        Fixture {
            gate,
            codec,
            store,
            audit,
        }
    }

    async fn login(f: &Fixture, id: u64) -> TokenPair {
        let pair = f.codec.issue_pair(id, false).unwrap();
        f.store.set(id, pair.refresh.token.clone()).await;
        pair
    }

    #[test]
    fn test_protect_missing() {
        let f = fixture();
        assert_eq!(
            f.gate.protect(None).unwrap_err().kind,
            ErrorKind::MissingCredential
        );
        assert_eq!(
            f.gate.protect(Some("  ")).unwrap_err().kind,
            ErrorKind::MissingCredential
        );
    }

    #[test]
    fn test_protect_invalid() {
        let f = fixture();
        assert_eq!(
            f.gate.protect(Some("garbage")).unwrap_err().kind,
            ErrorKind::InvalidCredential
        );
    }

    #[tokio::test]
    async fn test_protect_rejects_refresh_credential() {
        let f = fixture();
        let pair = login(&f, 3).await;
        let err = f.gate.protect(Some(&pair.refresh.token)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[tokio::test]
    async fn test_protect_attaches_claims() {
        let f = fixture();
        let pair = login(&f, 3).await;
        let claims = f.gate.protect(Some(&pair.access.token)).unwrap();
        assert_eq!(claims.id, 3);
        assert!(!claims.is_admin);
    }

    #[tokio::test]
    async fn test_rotation_chain_and_replay() {
        let f = fixture();
        let first = login(&f, 11).await;

        let second = f
            .gate
            .rotate(Some(&first.refresh.token), "10.0.0.1")
            .await
            .unwrap();
        assert_eq!(second.identity_id, 11);
        assert!(f.store.validate(11, &second.tokens.refresh.token).await);
        assert!(!f.store.validate(11, &first.refresh.token).await);

        let third = f
            .gate
            .rotate(Some(&second.tokens.refresh.token), "10.0.0.1")
            .await
            .unwrap();
        assert!(f.store.validate(11, &third.tokens.refresh.token).await);

        let err = f
            .gate
            .rotate(Some(&first.refresh.token), "10.6.6.6")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionCompromised);
        assert!(f.store.get(11).await.is_none());
        assert_eq!(f.audit.count("SUSPICIOUS_ACTIVITY"), 1);

        // The legitimate holder's latest credential is revoked too.
        let err = f
            .gate
            .rotate(Some(&third.tokens.refresh.token), "10.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionCompromised);
    }

    #[tokio::test]
    async fn test_rotation_after_logout_is_compromise() {
        let f = fixture();
        let pair = login(&f, 4).await;
        f.store.delete(4).await;

        let err = f
            .gate
            .rotate(Some(&pair.refresh.token), "unknown")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionCompromised);
    }

    #[tokio::test]
    async fn test_rotate_rejects_access_credential() {
        let f = fixture();
        let pair = login(&f, 4).await;
        let err = f
            .gate
            .rotate(Some(&pair.access.token), "unknown")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
        // A parse failure is not evidence of theft; the session survives.
        assert!(f.store.validate(4, &pair.refresh.token).await);
    }

    #[tokio::test]
    async fn test_rotate_missing() {
        let f = fixture();
        let err = f.gate.rotate(None, "unknown").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
    }
}
