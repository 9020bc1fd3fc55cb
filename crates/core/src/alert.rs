//! Alert records and their lifecycle.
//!
//! [`AlertRegistry`] owns every [`Alert`] in the process. Alerts are created
//! by threshold breaches or high-risk failure predictions, mutated only
//! through [`acknowledge`](AlertRegistry::acknowledge) and
//! [`resolve`](AlertRegistry::resolve), and never hard-deleted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::MetricCategory;
use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Severity of a threshold violation or escalated prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Value exceeded the threshold but not the critical multiplier.
    Warning,
    /// Value exceeded the critical multiplier, or a high-risk prediction.
    Critical,
}

/// What produced the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// A recorded value exceeded the series threshold.
    Threshold,
    /// A failure prediction crossed the escalation bounds.
    Predictive,
}

/// A single alert record.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: EntityId,
    pub category: MetricCategory,
    pub metric: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    /// The observed value (or failure probability for predictive alerts).
    pub value: f64,
    /// The threshold that was exceeded.
    pub threshold: f64,
    pub created_at: Timestamp,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
}

/// Input for creating an alert.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub category: MetricCategory,
    pub metric: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

/// Status filter for listing alerts. Deserialized straight from the
/// `status` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
    All,
}

/// Process-wide owner of alert records.
#[derive(Debug, Default)]
pub struct AlertRegistry {
    alerts: HashMap<EntityId, Alert>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new alert with a fresh id.
    pub fn create(&mut self, input: NewAlert, now: Timestamp) -> Alert {
        let alert = Alert {
            id: Uuid::new_v4(),
            category: input.category,
            metric: input.metric,
            kind: input.kind,
            severity: input.severity,
            message: input.message,
            value: input.value,
            threshold: input.threshold,
            created_at: now,
            acknowledged: false,
            acknowledged_at: None,
            resolved: false,
            resolved_at: None,
        };
        self.alerts.insert(alert.id, alert.clone());
        alert
    }

    /// List alerts matching `status`, newest first, truncated to `limit`.
    pub fn list(&self, status: AlertStatus, limit: usize) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .values()
            .filter(|a| match status {
                AlertStatus::Active => !a.resolved,
                AlertStatus::Resolved => a.resolved,
                AlertStatus::All => true,
            })
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts.truncate(limit);
        alerts
    }

    /// Mark an alert acknowledged.
    ///
    /// Idempotent: repeat calls keep the original acknowledgement timestamp.
    pub fn acknowledge(&mut self, id: EntityId, now: Timestamp) -> Result<Alert, CoreError> {
        let alert = self.get_mut(id)?;
        if !alert.acknowledged {
            alert.acknowledged = true;
            alert.acknowledged_at = Some(now);
        }
        Ok(alert.clone())
    }

    /// Mark an alert resolved.
    ///
    /// Idempotent, and independent of the acknowledged flag.
    pub fn resolve(&mut self, id: EntityId, now: Timestamp) -> Result<Alert, CoreError> {
        let alert = self.get_mut(id)?;
        if !alert.resolved {
            alert.resolved = true;
            alert.resolved_at = Some(now);
        }
        Ok(alert.clone())
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Alert, CoreError> {
        self.alerts
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "alert", id })
    }
}
