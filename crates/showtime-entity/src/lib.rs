//! # showtime-entity
//!
//! Records owned by the external user store. The authentication core only
//! reads the identity key, the privilege flag, and the password hash.

pub mod user;

pub use user::{CreateUser, User};
