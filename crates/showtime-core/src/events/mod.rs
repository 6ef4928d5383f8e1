//! Domain events emitted by the authentication core.

pub mod security;

pub use security::SecurityEvent;
