//! Admission control configuration.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound for both the sweep interval and the idle retention: 30 days.
pub const MAX_RETENTION_SECONDS: u64 = 30 * 24 * 3600;

/// Name of the limiter guarding authentication endpoints.
pub const AUTH_CLASS: &str = "auth";
/// Name of the limiter guarding administrative endpoints.
pub const ADMIN_CLASS: &str = "admin";
/// Name of the limiter guarding reservation endpoints.
pub const RESERVATION_CLASS: &str = "reservation";

/// Built-in parameters for the authentication class.
pub const AUTH_DEFAULT: BucketConfig = BucketConfig::new(5.0, 20);
/// Built-in parameters for the administrative class.
pub const ADMIN_DEFAULT: BucketConfig = BucketConfig::new(10.0, 50);
/// Built-in parameters for the reservation class.
pub const RESERVATION_DEFAULT: BucketConfig = BucketConfig::new(15.0, 100);

/// Token-bucket parameters for one endpoint sensitivity class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Tokens added per second.
    pub refill_per_second: f64,
    /// Maximum tokens a bucket can hold.
    pub burst: u32,
}

impl BucketConfig {
    /// Build a bucket configuration.
    pub const fn new(refill_per_second: f64, burst: u32) -> Self {
        Self {
            refill_per_second,
            burst,
        }
    }
}

/// Rate limiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Seconds between idle-bucket sweeps.
    #[serde(default = "default_reclaim_interval")]
    pub reclaim_interval_seconds: u64,
    /// Buckets untouched for longer than this are dropped.
    #[serde(default = "default_idle_retention")]
    pub idle_retention_seconds: u64,
    /// Named limiter classes.
    #[serde(default = "default_classes")]
    pub classes: BTreeMap<String, BucketConfig>,
}

impl RateLimitConfig {
    /// Look up a class, falling back to the built-in defaults.
    pub fn class(&self, name: &str) -> Option<BucketConfig> {
        self.classes
            .get(name)
            .copied()
            .or_else(|| default_classes().get(name).copied())
    }

    /// Idle retention as a duration, capped at [`MAX_RETENTION_SECONDS`].
    pub fn idle_retention(&self) -> Duration {
        Duration::seconds(capped_seconds(self.idle_retention_seconds))
    }

    /// Sweep interval, capped at [`MAX_RETENTION_SECONDS`].
    pub fn reclaim_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reclaim_interval_seconds.min(MAX_RETENTION_SECONDS))
    }

    /// Look up a class, falling back to `default` when it is not configured.
    pub fn class_or(&self, name: &str, default: BucketConfig) -> BucketConfig {
        self.classes.get(name).copied().unwrap_or(default)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reclaim_interval_seconds: default_reclaim_interval(),
            idle_retention_seconds: default_idle_retention(),
            classes: default_classes(),
        }
    }
}

fn capped_seconds(seconds: u64) -> i64 {
    i64::try_from(seconds.min(MAX_RETENTION_SECONDS)).unwrap_or(i64::MAX)
}

fn default_reclaim_interval() -> u64 {
    300
}

fn default_idle_retention() -> u64 {
    3600
}

fn default_classes() -> BTreeMap<String, BucketConfig> {
    BTreeMap::from([
        (AUTH_CLASS.to_string(), AUTH_DEFAULT),
        (ADMIN_CLASS.to_string(), ADMIN_DEFAULT),
        (RESERVATION_CLASS.to_string(), RESERVATION_DEFAULT),
    ])
}
