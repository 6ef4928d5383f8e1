//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::client_key;

/// Logs method, path, client, status, and latency. Server errors log at
/// `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_key(request.headers(), request.extensions());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %path, %client, status, latency_ms, "HTTP request failed");
    } else {
        info!(%method, %path, %client, status, latency_ms, "HTTP request");
    }

    response
}
