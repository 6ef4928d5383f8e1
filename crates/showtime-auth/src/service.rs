//! Registration, authentication, and session issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use showtime_core::config::AuthConfig;
use showtime_core::error::{AppError, ErrorKind};
use showtime_core::result::AppResult;
use showtime_core::traits::Repository;
use showtime_database::UserRepository;
use showtime_entity::user::{CreateUser, User};

use crate::jwt::{TokenCodec, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator, normalize_email, validate_email};
use crate::session::SessionStore;

const CREATED_MESSAGE: &str = "User created successfully";
const EXISTS_MESSAGE: &str = "User already exists";
const LOGIN_MESSAGE: &str = "User logged in successfully";

/// Email and password as presented by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Email, not yet normalized.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Result of a registration attempt.
///
/// Both branches succeed; `created` tells them apart.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationSummary {
    /// Identity key of the new or existing record.
    pub id: u64,
    /// Normalized email.
    pub email: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Whether this call created the record.
    pub created: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl RegistrationSummary {
    fn from_user(user: &User, created: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
            created,
            message: if created { CREATED_MESSAGE } else { EXISTS_MESSAGE }.to_string(),
        }
    }
}

/// Public view of an authenticated identity.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSummary {
    /// Identity key.
    pub id: u64,
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Administrative privilege.
    pub is_admin: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Human-readable outcome.
    pub message: String,
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// What the client is told.
    pub summary: LoginSummary,
    /// The full stored record.
    pub user: User,
}

/// Registers and authenticates identities and issues their sessions.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    codec: Arc<TokenCodec>,
    store: Arc<SessionStore>,
    /// Verified against when the email is unknown so both failure paths
    /// cost one Argon2 run.
    dummy_hash: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("validator", &self.validator)
            .finish()
    }
}

impl AuthService {
    /// Creates the service with its collaborators.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        store: Arc<SessionStore>,
    ) -> AppResult<Self> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash_password("showtime-unknown-identity")?;
        Ok(Self {
            users,
            hasher,
            validator: PasswordValidator::new(config),
            codec,
            store,
            dummy_hash,
        })
    }

    /// Register a new identity.
    ///
    /// An email that is already registered yields a non-error summary with
    /// `created == false`.
    pub async fn register(
        &self,
        candidate: &Credentials,
        username: Option<&str>,
    ) -> AppResult<RegistrationSummary> {
        validate_email(&candidate.email)?;
        let email = normalize_email(&candidate.email);
        let local_part = email.split('@').next().unwrap_or_default();
        self.validator.validate(&candidate.password, &[local_part])?;

        if let Some(existing) = self.users.find_by_email(&email).await? {
            info!(user_id = existing.id, "Registration for existing email");
            return Ok(RegistrationSummary::from_user(&existing, false));
        }

        let password_hash = self.hasher.hash_password(&candidate.password)?;
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(local_part)
            .to_string();

        let created = self
            .users
            .create(CreateUser {
                email: email.clone(),
                username,
                password_hash,
                is_admin: false,
            })
            .await;

        match created {
            Ok(user) => {
                info!(user_id = user.id, "User registered");
                Ok(RegistrationSummary::from_user(&user, true))
            }
            Err(e) if e.kind == ErrorKind::Conflict => {
                // Lost a race with a concurrent registration for the same email.
                let existing = self
                    .users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| AppError::persistence("User vanished after conflict"))?;
                Ok(RegistrationSummary::from_user(&existing, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, candidate: &Credentials) -> AppResult<LoginOutcome> {
        let email = normalize_email(&candidate.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            let _ = self
                .hasher
                .verify_password(&candidate.password, &self.dummy_hash);
            return Err(AppError::invalid_credentials());
        };

        if !self
            .hasher
            .verify_password(&candidate.password, &user.password_hash)?
        {
            return Err(AppError::invalid_credentials());
        }

        info!(user_id = user.id, "User authenticated");
        Ok(LoginOutcome {
            summary: LoginSummary {
                id: user.id,
                email: user.email.clone(),
                username: user.username.clone(),
                is_admin: user.is_admin,
                created_at: user.created_at,
                message: LOGIN_MESSAGE.to_string(),
            },
            user,
        })
    }

    /// Mint an access and refresh credential and make the refresh half the
    /// identity's only live session.
    pub async fn issue_session_tokens(
        &self,
        identity_id: u64,
        is_privileged: bool,
    ) -> AppResult<TokenPair> {
        let pair = self.codec.issue_pair(identity_id, is_privileged)?;
        self.store.set(identity_id, pair.refresh.token.clone()).await;
        Ok(pair)
    }

    /// Drop the identity's refresh credential. Outstanding access
    /// credentials stay valid until they expire.
    pub async fn revoke_session(&self, identity_id: u64) -> bool {
        let existed = self.store.delete(identity_id).await;
        info!(user_id = identity_id, existed, "Session revoked");
        existed
    }

    /// Make sure at least one administrator exists.
    ///
    /// Does nothing if any admin is present. Promotes an existing record
    /// with the given email, otherwise creates one.
    pub async fn ensure_default_admin(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<Option<User>> {
        if let Some(admin) = self.users.find_first_admin().await? {
            info!(user_id = admin.id, "Administrator already present");
            return Ok(None);
        }

        validate_email(email)?;
        let email = normalize_email(email);

        if let Some(mut existing) = self.users.find_by_email(&email).await? {
            warn!(user_id = existing.id, "Promoting existing user to administrator");
            existing.is_admin = true;
            return self.users.update(&existing).await.map(Some);
        }

        self.validator.validate(password, &[username])?;
        let admin = self
            .users
            .create(CreateUser {
                email,
                username: username.to_string(),
                password_hash: self.hasher.hash_password(password)?,
                is_admin: true,
            })
            .await?;

        info!(user_id = admin.id, "Default administrator created");
        Ok(Some(admin))
    }
}
