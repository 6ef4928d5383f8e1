//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;
/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TTL_HOURS: u64 = 365 * 24;

/// Credential signing, cookie, and password policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access credentials.
    #[serde(default = "default_access_secret")]
    pub jwt_access_secret: String,
    /// HMAC secret for refresh credentials. Must differ from the access secret.
    #[serde(default = "default_refresh_secret")]
    pub jwt_refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_hours: u64,
    /// Mark credential cookies `Secure` and emit HSTS. Enable in production.
    #[serde(default)]
    pub secure_cookies: bool,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn score (0-4) a password must reach.
    #[serde(default = "default_password_score")]
    pub password_min_score: u8,
    /// Email of the administrator seeded at startup. Empty disables seeding.
    #[serde(default)]
    pub default_admin_email: String,
    /// Username of the seeded administrator.
    #[serde(default = "default_admin_username")]
    pub default_admin_username: String,
    /// Password of the seeded administrator.
    #[serde(default)]
    pub default_admin_password: String,
}

impl AuthConfig {
    /// Access token lifetime in seconds, capped at [`MAX_ACCESS_TTL_MINUTES`].
    pub fn access_ttl_seconds(&self) -> i64 {
        minutes_to_seconds(self.jwt_access_ttl_minutes.min(MAX_ACCESS_TTL_MINUTES))
    }

    /// Refresh token lifetime in seconds, capped at [`MAX_REFRESH_TTL_HOURS`].
    pub fn refresh_ttl_seconds(&self) -> i64 {
        minutes_to_seconds(self.jwt_refresh_ttl_hours.min(MAX_REFRESH_TTL_HOURS) * 60)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_access_secret: default_access_secret(),
            jwt_refresh_secret: default_refresh_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            jwt_refresh_ttl_hours: default_refresh_ttl(),
            secure_cookies: false,
            password_min_length: default_password_min(),
            password_min_score: default_password_score(),
            default_admin_email: String::new(),
            default_admin_username: default_admin_username(),
            default_admin_password: String::new(),
        }
    }
}

// Inputs are capped by the callers, so the product always fits.
fn minutes_to_seconds(minutes: u64) -> i64 {
    i64::try_from(minutes.saturating_mul(60)).unwrap_or(i64::MAX)
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    12
}

fn default_password_score() -> u8 {
    2
}

fn default_admin_username() -> String {
    "admin".to_string()
}
