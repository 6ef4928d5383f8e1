//! Axum middleware stack.

pub mod cors;
pub mod logging;
pub mod rate_limit;
pub mod rbac;
pub mod security_headers;
pub mod session;

pub use rate_limit::{RateDecision, RateLimiter, RateLimiters};

use axum::extract::{OriginalUri, Request};

/// Full request path, including any prefix stripped by `nest`.
pub(crate) fn request_path(request: &Request) -> String {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
