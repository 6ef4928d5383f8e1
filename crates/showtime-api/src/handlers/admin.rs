//! Admin session management handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use showtime_core::events::SecurityEvent;

use crate::dto::response::RevokeResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// DELETE /api/admin/sessions/{id}
///
/// Drops the identity's refresh credential. Its outstanding access
/// credentials stay valid until they expire.
pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<u64>,
) -> Json<RevokeResponse> {
    let revoked = state.auth.revoke_session(user_id).await;
    state.audit.record(SecurityEvent::SessionRevoked {
        user_id,
        revoked_by: auth.id(),
    });
    info!(user_id, revoked_by = auth.id(), revoked, "Admin revoked session");

    let message = if revoked {
        "Session revoked"
    } else {
        "No active session"
    };
    Json(RevokeResponse {
        user_id,
        revoked,
        message: message.to_string(),
    })
}
