//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use showtime_api::{AppState, build_app};
use showtime_core::clock::ManualClock;
use showtime_core::config::AppConfig;
use showtime_core::traits::MemoryAuditSink;
use showtime_database::MemoryUserRepository;

/// Password that satisfies the default strength policy.
pub const STRONG_PASSWORD: &str = "Str0ng!Passw0rd123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct access to services
    pub state: AppState,
    /// Clock driving credential expiry and bucket refill
    pub clock: Arc<ManualClock>,
    /// Recorded security events
    pub audit: Arc<MemoryAuditSink>,
}

/// Configuration with test secrets and an in-memory user store.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_access_secret = "integration-access-secret-0123456789".to_string();
    config.auth.jwt_refresh_secret = "integration-refresh-secret-9876543210".to_string();
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let audit = Arc::new(MemoryAuditSink::new());
        let state = AppState::new(
            config,
            Arc::new(MemoryUserRepository::new()),
            clock.clone(),
            audit.clone(),
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state.clone()),
            state,
            clock,
            audit,
        }
    }

    /// Send a request with optional JSON body and extra headers
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST /api/auth/register
    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({ "email": email, "password": password })),
            &[],
        )
        .await
    }

    /// POST /api/auth/login
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": email, "password": password })),
            &[],
        )
        .await
    }

    /// Register and log in, returning the login response
    pub async fn signed_in(&self, email: &str) -> TestResponse {
        let registered = self.register(email, STRONG_PASSWORD).await;
        assert_eq!(registered.status, StatusCode::CREATED);
        let login = self.login(email, STRONG_PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK);
        login
    }

    /// Seed an administrator directly through the service
    pub async fn create_admin(&self, email: &str) {
        self.state
            .auth
            .ensure_default_admin(email, "admin", STRONG_PASSWORD)
            .await
            .expect("Failed to seed admin");
    }
}

/// A captured response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Every `Set-Cookie` header value
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect()
    }

    /// The full `Set-Cookie` line for a cookie name
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&prefix))
    }

    /// The value a `Set-Cookie` header assigns to `name`
    pub fn cookie(&self, name: &str) -> Option<String> {
        let line = self.set_cookie(name)?;
        let value = line.split(';').next()?.split_once('=')?.1.to_string();
        if value.is_empty() { None } else { Some(value) }
    }

    /// A header value as a string
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// The `error` field of an error body
    pub fn error_kind(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// A `Cookie` request header value
pub fn cookie_header(name: &str, value: &str) -> String {
    format!("{name}={value}")
}
