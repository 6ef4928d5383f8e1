//! In-process user store.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use showtime_core::error::AppError;
use showtime_core::result::AppResult;
use showtime_core::traits::Repository;
use showtime_entity::user::{CreateUser, User};

use super::UserRepository;

/// User records held in concurrent maps.
///
/// The email index is the uniqueness authority: a create claims the email
/// slot before the record is inserted.
#[derive(Debug)]
pub struct MemoryUserRepository {
    users: DashMap<u64, User>,
    by_email: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl MemoryUserRepository {
    /// Create an empty store. Identity keys start at 1.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_email: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<User, CreateUser, u64> for MemoryUserRepository {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        match self.by_email.entry(data.email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "User with email '{}' already exists",
                data.email
            ))),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let user = User::from_create(id, data, Utc::now());
                self.users.insert(id, user.clone());
                slot.insert(id);
                debug!(user_id = id, "User record created");
                Ok(user)
            }
        }
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let previous_email = match self.users.get(&user.id) {
            Some(existing) => existing.email.clone(),
            None => return Err(AppError::persistence(format!("User {} not found", user.id))),
        };

        if previous_email != user.email {
            match self.by_email.entry(user.email.clone()) {
                Entry::Occupied(_) => {
                    return Err(AppError::conflict(format!(
                        "User with email '{}' already exists",
                        user.email
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.by_email.remove(&previous_email);
        }

        let mut stored = user.clone();
        stored.updated_at = Utc::now();
        self.users.insert(user.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: u64) -> AppResult<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.by_email.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.by_email.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_first_admin(&self) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.is_admin)
            .min_by_key(|u| u.id)
            .map(|u| u.value().clone()))
    }
}
