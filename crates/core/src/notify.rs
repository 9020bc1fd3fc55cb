//! Outbound alert delivery capability.
//!
//! Delivery is fire-and-forget relative to the ingestion path: a sink must
//! swallow its own failures, and callers never wait on it. Tests inject a
//! recording sink to assert on dispatched alerts without a network.

use crate::alert::Alert;

/// Single-method capability for delivering alerts to an external channel
/// (email, SMS, webhook, ...).
pub trait AlertSink: Send + Sync {
    /// Deliver `alert`. Must not block and must not propagate failures.
    fn dispatch(&self, alert: &Alert);
}

/// Default sink: writes the alert to the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn dispatch(&self, alert: &Alert) {
        tracing::info!(
            alert_id = %alert.id,
            category = %alert.category,
            metric = %alert.metric,
            severity = ?alert.severity,
            value = alert.value,
            "Alert dispatched"
        );
    }
}
