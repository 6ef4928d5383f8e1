//! Protect gate as a route layer.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::carrier;
use crate::error::ApiError;
use crate::state::AppState;

/// Rejects requests without a valid access credential and attaches the
/// parsed claims for downstream handlers.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = carrier::access_credential(request.headers());
    let claims = state.gate.protect(credential.as_deref()).map_err(|e| {
        debug!(path = %super::request_path(&request), error = %e, "Access credential rejected");
        ApiError(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
