//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique identity key. Stored as `BIGINT`.
    #[sqlx(try_from = "i64")]
    pub id: u64,
    /// Normalized (lowercase) email, unique.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the identity holds administrative privilege.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a stored record from a creation request.
    pub fn from_create(id: u64, data: CreateUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            is_admin: data.is_admin,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Already-hashed password.
    pub password_hash: String,
    /// Administrative privilege.
    pub is_admin: bool,
}
