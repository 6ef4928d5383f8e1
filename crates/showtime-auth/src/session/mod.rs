//! Refresh credential store and the request gates built on it.

pub mod gate;
pub mod store;

pub use gate::{RotatedSession, SessionGate};
pub use store::{RotationOutcome, SessionStore};
