//! Route definitions for the Showtime HTTP API.
//!
//! All routes are mounted under `/api`. Route layers run outermost-last:
//! admission control first, then the protect gate, then the admin check.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware::rate_limit::rate_limit;
use crate::middleware::rbac::require_admin;
use crate::middleware::session::require_session;
use crate::state::AppState;

/// Build the API router and thread `AppState` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(account_routes(&state))
        .merge(admin_routes(&state))
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Register, login, renew: auth limiter only. Logout also needs a session.
fn auth_routes(state: &AppState) -> Router<AppState> {
    let limiter = state.limiters.auth.clone();

    let public = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/renew", post(handlers::auth::renew));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    public
        .merge(protected)
        .route_layer(axum_middleware::from_fn_with_state(limiter, rate_limit))
}

/// Session introspection for signed-in users.
fn account_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.limiters.reservation.clone(),
            rate_limit,
        ))
}

/// Admin-only endpoints.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/sessions/{id}",
            delete(handlers::admin::revoke_session),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.limiters.admin.clone(),
            rate_limit,
        ))
}

/// Liveness probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
