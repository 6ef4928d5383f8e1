//! Auth handlers: register, login, renew, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use tracing::info;

use showtime_auth::{AccessGrant, Credentials, RegistrationSummary, TokenPair};
use showtime_core::error::ErrorKind;
use showtime_core::events::SecurityEvent;

use crate::carrier::{self, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, SessionInfo};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientKey, ValidJson};
use crate::state::AppState;

type CookieHeaders = AppendHeaders<[(HeaderName, HeaderValue); 2]>;

fn session_cookies(state: &AppState, tokens: &TokenPair) -> Result<CookieHeaders, ApiError> {
    let auth = &state.config.auth;
    let access = carrier::set_cookie(
        ACCESS_COOKIE,
        &tokens.access.token,
        auth.access_ttl_seconds(),
        auth.secure_cookies,
    )?;
    let refresh = carrier::set_cookie(
        REFRESH_COOKIE,
        &tokens.refresh.token,
        auth.refresh_ttl_seconds(),
        auth.secure_cookies,
    )?;
    Ok(AppendHeaders([(SET_COOKIE, access), (SET_COOKIE, refresh)]))
}

fn cleared_cookies(state: &AppState) -> Result<CookieHeaders, ApiError> {
    let secure = state.config.auth.secure_cookies;
    Ok(AppendHeaders([
        (SET_COOKIE, carrier::clear_cookie(ACCESS_COOKIE, secure)?),
        (SET_COOKIE, carrier::clear_cookie(REFRESH_COOKIE, secure)?),
    ]))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationSummary>), ApiError> {
    let summary = state
        .auth
        .register(&req.credentials(), req.username.as_deref())
        .await?;

    state.audit.record(SecurityEvent::Registration {
        email: summary.email.clone(),
        client,
        created: summary.created,
    });

    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.clone();
    let credentials: Credentials = req.into();
    let outcome = match state.auth.authenticate(&credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.kind == ErrorKind::InvalidCredentials {
                state.audit.record(SecurityEvent::LoginFailure {
                    email,
                    client,
                    reason: "invalid credentials".to_string(),
                });
            }
            return Err(e.into());
        }
    };

    let tokens = state
        .auth
        .issue_session_tokens(outcome.user.id, outcome.user.is_admin)
        .await?;
    let cookies = session_cookies(&state, &tokens)?;

    state.audit.record(SecurityEvent::LoginSuccess {
        user_id: outcome.user.id,
        email: outcome.user.email.clone(),
        client,
    });

    Ok((cookies, Json(LoginResponse::new(outcome.summary, &tokens))))
}

/// POST /api/auth/renew
///
/// A replayed refresh credential also clears both cookies.
pub async fn renew(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let credential = carrier::refresh_credential(&headers);
    match state.gate.rotate(credential.as_deref(), &client).await {
        Ok(rotated) => {
            let cookies = session_cookies(&state, &rotated.tokens)?;
            Ok((cookies, Json(AccessGrant::from(&rotated.tokens))).into_response())
        }
        Err(e) if e.kind == ErrorKind::SessionCompromised => {
            Ok((cleared_cookies(&state)?, ApiError(e)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.revoke_session(auth.id()).await;
    state.audit.record(SecurityEvent::Logout {
        user_id: auth.id(),
        client,
    });
    info!(user_id = auth.id(), "User logged out");

    Ok((
        cleared_cookies(&state)?,
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<SessionInfo> {
    Json(SessionInfo::from(&auth.0))
}
