//! Token bucket admission control.
//!
//! One bucket per client key, all behind a single mutex so the refill and
//! the admit decision happen in one critical section. The idle sweep takes
//! the same lock.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use showtime_core::clock::Clock;
use showtime_core::config::RateLimitConfig;
use showtime_core::config::rate_limit::{
    ADMIN_CLASS, ADMIN_DEFAULT, AUTH_CLASS, AUTH_DEFAULT, BucketConfig, RESERVATION_CLASS,
    RESERVATION_DEFAULT,
};
use showtime_core::error::AppError;
use showtime_core::events::SecurityEvent;
use showtime_core::traits::AuditSink;

use crate::error::ApiError;
use crate::extractors::client_key;

/// Result of asking a limiter for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request may proceed.
    Admitted {
        /// Whole tokens left after this request.
        remaining: u32,
    },
    /// The bucket is empty.
    Rejected {
        /// Seconds until one token is available, rounded up.
        retry_after_secs: u64,
    },
}

impl RateDecision {
    /// Whether the request was admitted.
    pub fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: DateTime<Utc>,
}

/// In-memory token bucket rate limiter for one sensitivity class.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Class name used in logs and audit events.
    class: Arc<str>,
    /// Client key → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    burst: u32,
    /// Token refill rate per second.
    refill_rate: f64,
    /// Buckets untouched for longer than this are reclaimed.
    idle_retention: Duration,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
}

impl RateLimiter {
    /// Creates a new rate limiter. A negative retention is treated as zero.
    pub fn new(
        class: &str,
        bucket: BucketConfig,
        idle_retention: Duration,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            class: Arc::from(class),
            buckets: Arc::new(Mutex::new(HashMap::new())),
            burst: bucket.burst,
            refill_rate: bucket.refill_per_second,
            idle_retention: idle_retention.max(Duration::zero()),
            clock,
            audit,
        }
    }

    /// Class name of this limiter.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Bucket capacity.
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Attempts to consume a token for the given key.
    pub async fn check(&self, key: &str) -> RateDecision {
        let now = self.clock.now();
        let burst = f64::from(self.burst);
        let mut buckets = self.buckets.lock().await;

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: burst,
            last_refill: now,
        });

        // A clock that stepped backwards refills nothing.
        let elapsed = (now - bucket.last_refill).num_milliseconds().max(0) as f64 / 1000.0;
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(burst);
        if now > bucket.last_refill {
            bucket.last_refill = now;
        }

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            RateDecision::Admitted {
                remaining: bucket.tokens.floor() as u32,
            }
        } else {
            let wait = ((1.0 - bucket.tokens) / self.refill_rate).ceil();
            RateDecision::Rejected {
                retry_after_secs: (wait as u64).max(1),
            }
        }
    }

    /// Boolean view of [`check`](Self::check).
    pub async fn allow(&self, key: &str) -> bool {
        self.check(key).await.is_admitted()
    }

    /// Remove buckets idle for longer than the retention window.
    pub async fn reclaim_idle(&self) -> usize {
        let cutoff = self.clock.now() - self.idle_retention;
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| bucket.last_refill >= cutoff);
        before - buckets.len()
    }

    /// Number of tracked client keys.
    pub async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Run [`reclaim_idle`](Self::reclaim_idle) every `interval` until
    /// `shutdown` turns true or its sender is dropped.
    pub fn spawn_reclaimer(
        &self,
        interval: std::time::Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = limiter.reclaim_idle().await;
                        if removed > 0 {
                            debug!(class = %limiter.class, removed, "Reclaimed idle rate limit buckets");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!(class = %limiter.class, "Rate limit reclaimer stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}

/// The limiter classes used by the router.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    /// Authentication endpoints.
    pub auth: RateLimiter,
    /// Administrative endpoints.
    pub admin: RateLimiter,
    /// Reservation and account endpoints.
    pub reservation: RateLimiter,
}

impl RateLimiters {
    /// Build every class from configuration, falling back to the defaults.
    pub fn from_config(
        config: &RateLimitConfig,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let retention = config.idle_retention();
        let build = |name: &str, default: BucketConfig| {
            RateLimiter::new(
                name,
                config.class_or(name, default),
                retention,
                Arc::clone(&clock),
                Arc::clone(&audit),
            )
        };
        Self {
            auth: build(AUTH_CLASS, AUTH_DEFAULT),
            admin: build(ADMIN_CLASS, ADMIN_DEFAULT),
            reservation: build(RESERVATION_CLASS, RESERVATION_DEFAULT),
        }
    }

    /// Every limiter, for spawning reclaimers.
    pub fn all(&self) -> [&RateLimiter; 3] {
        [&self.auth, &self.admin, &self.reservation]
    }
}

/// Middleware admitting or rejecting a request against one limiter.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(request.headers(), request.extensions());
    let limit = HeaderValue::from(limiter.burst);

    match limiter.check(&client).await {
        RateDecision::Admitted { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", limit);
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        RateDecision::Rejected { retry_after_secs } => {
            let path = super::request_path(&request);
            warn!(class = %limiter.class, client = %client, path = %path, "Rate limit exceeded");
            limiter.audit.record(SecurityEvent::RateLimitExceeded {
                class: limiter.class.to_string(),
                client,
                path,
            });

            let mut response =
                ApiError(AppError::rate_limited("Rate limit exceeded")).into_response();
            let headers = response.headers_mut();
            headers.insert("retry-after", HeaderValue::from(retry_after_secs));
            headers.insert("x-ratelimit-limit", limit);
            headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
            response
        }
    }
}
