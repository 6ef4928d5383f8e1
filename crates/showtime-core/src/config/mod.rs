//! Layered application configuration.
//!
//! Sources, lowest precedence first: `config/default.toml`,
//! `config/{env}.toml`, then `SHOWTIME__SECTION__KEY` environment variables.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod rate_limit;

pub use app::{CorsConfig, ServerConfig};
pub use auth::{AuthConfig, MAX_ACCESS_TTL_MINUTES, MAX_REFRESH_TTL_HOURS};
pub use database::DatabaseConfig;
pub use logging::LoggingConfig;
pub use rate_limit::{BucketConfig, MAX_RETENTION_SECONDS, RateLimitConfig};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Admission control settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// User-record store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHOWTIME")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Reject configurations the server cannot run safely with.
    pub fn validate(&self) -> Result<(), AppError> {
        let auth = &self.auth;
        if auth.jwt_access_secret.is_empty() || auth.jwt_refresh_secret.is_empty() {
            return Err(AppError::configuration("JWT secrets must not be empty"));
        }
        if auth.jwt_access_secret == auth.jwt_refresh_secret {
            return Err(AppError::configuration(
                "Access and refresh secrets must differ",
            ));
        }
        if auth.jwt_access_ttl_minutes == 0 || auth.jwt_refresh_ttl_hours == 0 {
            return Err(AppError::configuration("Token TTLs must be positive"));
        }
        if auth.jwt_access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "jwt_access_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if auth.jwt_refresh_ttl_hours > MAX_REFRESH_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "jwt_refresh_ttl_hours must not exceed {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        if auth.password_min_score > 4 {
            return Err(AppError::configuration(
                "password_min_score must be between 0 and 4",
            ));
        }

        for (name, class) in &self.rate_limit.classes {
            if class.burst == 0 || class.refill_per_second <= 0.0 {
                return Err(AppError::configuration(format!(
                    "Rate limit class '{name}' needs a positive burst and refill rate"
                )));
            }
        }
        let limits = &self.rate_limit;
        for (name, seconds) in [
            ("reclaim_interval_seconds", limits.reclaim_interval_seconds),
            ("idle_retention_seconds", limits.idle_retention_seconds),
        ] {
            if seconds == 0 || seconds > MAX_RETENTION_SECONDS {
                return Err(AppError::configuration(format!(
                    "{name} must be between 1 and {MAX_RETENTION_SECONDS}"
                )));
            }
        }

        if !auth.default_admin_email.is_empty() && auth.default_admin_password.is_empty() {
            return Err(AppError::configuration(
                "default_admin_password is required when default_admin_email is set",
            ));
        }

        Ok(())
    }

    /// Whether the configured secrets are still the shipped placeholders.
    pub fn uses_placeholder_secrets(&self) -> bool {
        self.auth.jwt_access_secret.starts_with("CHANGE_ME")
            || self.auth.jwt_refresh_secret.starts_with("CHANGE_ME")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.uses_placeholder_secrets());
        assert_eq!(config.auth.access_ttl_seconds(), 900);
        assert_eq!(config.auth.refresh_ttl_seconds(), 86_400);
    }

    #[test]
    fn test_default_limiter_classes() {
        let config = RateLimitConfig::default();
        assert_eq!(
            config.class(rate_limit::AUTH_CLASS),
            Some(BucketConfig::new(5.0, 20))
        );
        assert_eq!(
            config.class(rate_limit::ADMIN_CLASS),
            Some(BucketConfig::new(10.0, 50))
        );
        assert_eq!(
            config.class(rate_limit::RESERVATION_CLASS),
            Some(BucketConfig::new(15.0, 100))
        );
        assert_eq!(config.class("browsing"), None);
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_refresh_secret = config.auth.jwt_access_secret.clone();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_burst_rejected() {
        let mut config = AppConfig::default();
        config
            .rate_limit
            .classes
            .insert("browsing".to_string(), BucketConfig::new(1.0, 0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_idle_retention_bounds() {
        let mut config = AppConfig::default();
        config.rate_limit.idle_retention_seconds = 0;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        config.rate_limit.idle_retention_seconds = u64::MAX;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        config.rate_limit.idle_retention_seconds = 100_000_000_000_000_000;
        assert!(config.validate().is_err());

        config.rate_limit.idle_retention_seconds = MAX_RETENTION_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reclaim_interval_bounds() {
        let mut config = AppConfig::default();
        config.rate_limit.reclaim_interval_seconds = 0;
        assert!(config.validate().is_err());
        config.rate_limit.reclaim_interval_seconds = MAX_RETENTION_SECONDS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unvalidated_retention_stays_positive() {
        let mut config = RateLimitConfig::default();
        assert_eq!(config.idle_retention(), chrono::Duration::hours(1));

        config.idle_retention_seconds = u64::MAX;
        let retention = config.idle_retention();
        assert!(retention > chrono::Duration::zero());
        assert_eq!(retention.num_seconds(), MAX_RETENTION_SECONDS as i64);
        assert_eq!(
            config.reclaim_interval(),
            std::time::Duration::from_secs(300)
        );
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut config = AppConfig::default();
        config.auth.jwt_access_ttl_minutes = MAX_ACCESS_TTL_MINUTES + 1;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        let mut config = AppConfig::default();
        config.auth.jwt_refresh_ttl_hours = u64::MAX;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        config.auth.jwt_refresh_ttl_hours = MAX_REFRESH_TTL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unvalidated_ttls_do_not_overflow() {
        let config = AuthConfig {
            jwt_access_ttl_minutes: u64::MAX,
            jwt_refresh_ttl_hours: u64::MAX,
            ..AuthConfig::default()
        };
        assert_eq!(config.access_ttl_seconds(), 86_400);
        assert_eq!(config.refresh_ttl_seconds(), 365 * 86_400);
    }

    #[test]
    fn test_admin_email_requires_password() {
        let mut config = AppConfig::default();
        config.auth.default_admin_email = "admin@example.com".to_string();
        assert!(config.validate().is_err());
        config.auth.default_admin_password = "An0ther!Secret99".to_string();
        assert!(config.validate().is_ok());
    }
}
