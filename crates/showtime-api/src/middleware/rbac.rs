//! Privilege checks for administrative routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use showtime_auth::Claims;
use showtime_core::error::AppError;
use showtime_core::events::SecurityEvent;

use crate::error::ApiError;
use crate::extractors::client_key;
use crate::state::AppState;

/// Checks that the attached identity carries administrative privilege.
pub fn ensure_admin(claims: &Claims) -> Result<(), AppError> {
    if !claims.is_admin {
        return Err(AppError::forbidden("Forbidden: requires admin privileges"));
    }
    Ok(())
}

/// Route layer placed after [`require_session`](super::session::require_session).
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ApiError(AppError::missing_credential("Authentication required")))?;

    if let Err(e) = ensure_admin(claims) {
        let client = client_key(request.headers(), request.extensions());
        let resource = super::request_path(&request);
        warn!(user_id = claims.id, resource = %resource, "Non-admin access to admin route");
        state.audit.record(SecurityEvent::UnauthorizedAccess {
            user_id: claims.id,
            resource,
            client,
        });
        return Err(ApiError(e));
    }

    Ok(next.run(request).await)
}
