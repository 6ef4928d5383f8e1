//! User repository trait and its implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use showtime_core::result::AppResult;
use showtime_core::traits::Repository;
use showtime_entity::user::{CreateUser, User};

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

/// User-specific lookups on top of the generic CRUD contract.
///
/// `create` must fail with a `Conflict` error when the email is taken.
#[async_trait]
pub trait UserRepository: Repository<User, CreateUser, u64> {
    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find any user holding administrative privilege.
    async fn find_first_admin(&self) -> AppResult<Option<User>>;
}
