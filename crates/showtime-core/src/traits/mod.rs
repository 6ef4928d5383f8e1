//! Collaborator traits implemented outside this crate.

pub mod audit;
pub mod repository;

pub use audit::{AuditSink, MemoryAuditSink, NoopAuditSink};
pub use repository::Repository;
