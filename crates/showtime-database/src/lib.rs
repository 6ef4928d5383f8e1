//! # showtime-database
//!
//! Concrete implementations of the user-record collaborator. The in-memory
//! store backs tests and single-process deployments; the PostgreSQL store
//! is selected when a database URL is configured.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryUserRepository, PgUserRepository, UserRepository};
