//! # showtime-core
//!
//! Core crate for the Showtime reservation API's authentication gate.
//! Contains the unified error system, layered configuration, the
//! injectable time source, security audit events, and the collaborator
//! traits the other crates implement.
//!
//! This crate has **no** internal dependencies on other Showtime crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
