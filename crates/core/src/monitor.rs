//! The monitoring context object.
//!
//! [`Monitor`] owns the time series store, the alert registry, the analytics
//! engine, and the predictive maintenance engine, together with the injected
//! [`Clock`] and [`AlertSink`] collaborators. It is explicitly constructed
//! (no process-wide singletons) so tests can build isolated instances, and
//! it wires the flows together: threshold breaches and escalating
//! predictions become alerts, and every created alert is handed to the sink.

use std::sync::Arc;

use crate::alert::{Alert, AlertKind, AlertRegistry, AlertSeverity, AlertStatus, NewAlert};
use crate::analytics::{AnalyticsEngine, AnalyticsReport};
use crate::catalog::MetricCategory;
use crate::clock::Clock;
use crate::dashboard::{self, WidgetPayload, WidgetSpec};
use crate::error::CoreError;
use crate::maintenance::{
    Prediction, PredictiveMaintenanceEngine, SensorData, ESCALATION_PROBABILITY,
};
use crate::notify::AlertSink;
use crate::store::{SeriesSnapshot, ThresholdBreach, TimeSeriesStore};
use crate::timerange::parse_time_range;
use crate::types::{EntityId, Timestamp};

pub struct Monitor {
    store: TimeSeriesStore,
    alerts: AlertRegistry,
    analytics: AnalyticsEngine,
    maintenance: PredictiveMaintenanceEngine,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AlertSink>,
}

impl Monitor {
    /// Build a context with a catalogue-seeded store and empty registries.
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            store: TimeSeriesStore::new(),
            alerts: AlertRegistry::new(),
            analytics: AnalyticsEngine::new(),
            maintenance: PredictiveMaintenanceEngine::new(),
            clock,
            sink,
        }
    }

    /// Record one observation; raises and dispatches a threshold alert on
    /// breach.
    ///
    /// Returns [`CoreError::UnknownMetric`] for pairs outside the
    /// catalogue; whether that is surfaced or swallowed is the ingestion
    /// layer's call.
    pub fn record_metric(
        &mut self,
        category: MetricCategory,
        metric: &str,
        value: f64,
        timestamp: Option<Timestamp>,
    ) -> Result<(), CoreError> {
        let now = self.clock.now();
        let timestamp = timestamp.unwrap_or(now);

        let breach = self.store.record(category, metric, value, timestamp)?;
        if let Some(breach) = breach {
            self.raise_threshold_alert(breach, now);
        }
        Ok(())
    }

    /// Snapshot series (optionally scoped to one category) over the window
    /// ending now.
    pub fn metrics(&self, category: Option<MetricCategory>, range: &str) -> Vec<SeriesSnapshot> {
        let now = self.clock.now();
        self.store.snapshot(category, now - parse_time_range(range), now)
    }

    /// List alerts, newest first.
    pub fn alerts(&self, status: AlertStatus, limit: usize) -> Vec<Alert> {
        self.alerts.list(status, limit)
    }

    pub fn acknowledge_alert(&mut self, id: EntityId) -> Result<Alert, CoreError> {
        let now = self.clock.now();
        self.alerts.acknowledge(id, now)
    }

    pub fn resolve_alert(&mut self, id: EntityId) -> Result<Alert, CoreError> {
        let now = self.clock.now();
        self.alerts.resolve(id, now)
    }

    /// Generate and retain an analytics report.
    pub fn generate_report(
        &mut self,
        time_range: &str,
        categories: Option<&[MetricCategory]>,
    ) -> AnalyticsReport {
        let now = self.clock.now();
        self.analytics
            .generate_report(&self.store, time_range, categories, now)
    }

    pub fn report(&self, id: EntityId) -> Result<AnalyticsReport, CoreError> {
        self.analytics
            .report(id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "report",
                id,
            })
    }

    /// Run the failure prediction rules for a device; escalating component
    /// predictions raise and dispatch predictive alerts.
    pub fn predict(&mut self, device_id: &str, sensors: SensorData) -> Prediction {
        let now = self.clock.now();
        let prediction = self.maintenance.predict(device_id, sensors, now);

        for component in prediction.predictions.iter().filter(|p| p.needs_escalation()) {
            let alert = self.alerts.create(
                NewAlert {
                    category: MetricCategory::Devices,
                    metric: format!("{device_id}/{}", component.component),
                    kind: AlertKind::Predictive,
                    severity: AlertSeverity::Critical,
                    message: format!(
                        "Predicted {} of {} on {device_id} (probability {:.2}, \
                         ~{} days to failure)",
                        component.failure_mode,
                        component.component,
                        component.probability,
                        component.time_to_failure_ms / 86_400_000,
                    ),
                    value: component.probability,
                    threshold: ESCALATION_PROBABILITY,
                },
                now,
            );
            self.sink.dispatch(&alert);
        }

        prediction
    }

    /// Prediction history for a device, oldest first.
    pub fn prediction_history(&self, device_id: &str) -> Vec<Prediction> {
        self.maintenance.history(device_id).to_vec()
    }

    /// Materialize dashboard widgets against the store.
    pub fn compose_dashboard(
        &self,
        widgets: &[WidgetSpec],
    ) -> Result<Vec<WidgetPayload>, CoreError> {
        dashboard::compose(&self.store, widgets, self.clock.now())
    }

    fn raise_threshold_alert(&mut self, breach: ThresholdBreach, now: Timestamp) {
        let alert = self.alerts.create(
            NewAlert {
                category: breach.category,
                metric: breach.metric.clone(),
                kind: AlertKind::Threshold,
                severity: breach.severity,
                message: format!(
                    "{}/{} exceeded threshold: {} > {}",
                    breach.category, breach.metric, breach.value, breach.threshold
                ),
                value: breach.value,
                threshold: breach.threshold,
            },
            now,
        );
        self.sink.dispatch(&alert);
    }
}
