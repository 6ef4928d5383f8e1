//! PostgreSQL-backed user store.

use async_trait::async_trait;
use sqlx::PgPool;

use showtime_core::error::{AppError, ErrorKind};
use showtime_core::result::AppResult;
use showtime_core::traits::Repository;
use showtime_entity::user::{CreateUser, User};

use super::UserRepository;

const USER_COLUMNS: &str = "id, email, username, password_hash, is_admin, created_at, updated_at";

/// Repository for user records in the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::with_source(ErrorKind::Conflict, "User with this email already exists", e)
        } else {
            AppError::with_source(ErrorKind::Persistence, context, e)
        }
    }
}

#[async_trait]
impl Repository<User, CreateUser, u64> for PgUserRepository {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find user by id"))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, username, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(data.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error("Failed to create user"))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = $2, username = $3, password_hash = $4, is_admin = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id as i64)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("Failed to update user"))?
        .ok_or_else(|| AppError::persistence(format!("User {} not found", user.id)))
    }

    async fn delete(&self, id: u64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("Failed to find user by email"))
    }

    async fn find_first_admin(&self) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_admin ORDER BY id LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("Failed to find admin user"))
    }
}
