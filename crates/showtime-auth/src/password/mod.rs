//! Password hashing and input policy checks.

pub mod hasher;
pub mod validator;

pub use hasher::PasswordHasher;
pub use validator::{PasswordValidator, normalize_email, validate_email};
