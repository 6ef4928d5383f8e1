//! Tracing-backed audit sink.

use tracing::{info, warn};

use showtime_core::events::SecurityEvent;
use showtime_core::traits::AuditSink;

/// Emits every event as a structured log line under the `security_audit`
/// target. Alerts are logged at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Create the sink.
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: SecurityEvent) {
        let event_type = event.event_type();
        let payload = serde_json::to_string(&event).unwrap_or_default();
        if event.is_alert() {
            warn!(target: "security_audit", event_type, event = %payload, "Security event");
        } else {
            info!(target: "security_audit", event_type, event = %payload, "Security event");
        }
    }
}
