//! Audit sink collaborator.
//!
//! Components that emit [`SecurityEvent`]s receive a sink explicitly rather
//! than reaching for process-wide state.

use std::sync::Mutex;

use crate::events::SecurityEvent;

/// Fire-and-forget destination for security events.
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    /// Record one event. Must not block or fail.
    fn record(&self, event: SecurityEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: SecurityEvent) {}
}

/// Keeps events in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events with the given wire type.
    pub fn count(&self, event_type: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: SecurityEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
