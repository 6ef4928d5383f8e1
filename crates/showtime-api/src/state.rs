//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use showtime_auth::{AuthService, SessionGate, SessionStore, TokenCodec};
use showtime_core::clock::Clock;
use showtime_core::config::AppConfig;
use showtime_core::result::AppResult;
use showtime_core::traits::AuditSink;
use showtime_database::UserRepository;

use crate::middleware::RateLimiters;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Time source for credentials and buckets
    pub clock: Arc<dyn Clock>,

    // ── Auth ─────────────────────────────────────────────────
    /// Access and refresh keyspaces
    pub codec: Arc<TokenCodec>,
    /// Live refresh credential per identity
    pub sessions: Arc<SessionStore>,
    /// Registration, login, and session issuance
    pub auth: Arc<AuthService>,
    /// Protect and rotate gates
    pub gate: Arc<SessionGate>,

    // ── Admission control ────────────────────────────────────
    /// Per-class token bucket limiters
    pub limiters: RateLimiters,

    // ── Collaborators ────────────────────────────────────────
    /// Security event destination
    pub audit: Arc<dyn AuditSink>,
    /// User record store
    pub users: Arc<dyn UserRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("clock", &self.clock)
            .field("limiters", &self.limiters)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every component from configuration and the injected
    /// collaborators.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
    ) -> AppResult<Self> {
        let codec = Arc::new(TokenCodec::new(&config.auth, Arc::clone(&clock)));
        let sessions = Arc::new(SessionStore::new());
        let auth = Arc::new(AuthService::new(
            &config.auth,
            Arc::clone(&users),
            Arc::clone(&codec),
            Arc::clone(&sessions),
        )?);
        let gate = Arc::new(SessionGate::new(
            Arc::clone(&codec),
            Arc::clone(&sessions),
            Arc::clone(&audit),
        ));
        let limiters =
            RateLimiters::from_config(&config.rate_limit, Arc::clone(&clock), Arc::clone(&audit));

        Ok(Self {
            config: Arc::new(config),
            clock,
            codec,
            sessions,
            auth,
            gate,
            limiters,
            audit,
            users,
        })
    }
}
