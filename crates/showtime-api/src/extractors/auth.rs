//! `AuthUser` extractor: the claims attached by the protect gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use showtime_auth::Claims;
use showtime_core::error::AppError;

use crate::error::ApiError;

/// Identity attached to the request by [`require_session`].
///
/// [`require_session`]: crate::middleware::session::require_session
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The attached identity key.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Whether the identity carries administrative privilege.
    pub fn is_admin(&self) -> bool {
        self.0.is_admin
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::missing_credential("Authentication required")))
    }
}
