//! Bounded per-metric time series storage and threshold evaluation.
//!
//! [`TimeSeriesStore`] owns every [`MetricSeries`] in the process. It is
//! seeded from the fixed catalogue at construction and rejects writes to
//! pairs outside it. Threshold evaluation happens inline on `record`; the
//! caller decides what to do with the returned [`ThresholdBreach`].

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::alert::AlertSeverity;
use crate::catalog::{MetricCategory, SeriesSpec, CATALOG};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum number of history entries retained per series.
pub const HISTORY_CAPACITY: usize = 1000;

/// Multiplier over the configured threshold at which a breach escalates
/// from warning to critical.
pub const CRITICAL_MULTIPLIER: f64 = 1.5;

/// One recorded observation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricPoint {
    pub value: f64,
    pub timestamp: Timestamp,
}

/// A named, categorized series with its rolling history.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub category: MetricCategory,
    pub name: String,
    pub current_value: f64,
    pub threshold: Option<f64>,
    /// Insertion-ordered history, oldest first. Out-of-order timestamps are
    /// kept in arrival order; eviction is strictly FIFO.
    history: VecDeque<MetricPoint>,
}

impl MetricSeries {
    fn from_spec(spec: &SeriesSpec) -> Self {
        Self {
            category: spec.category,
            name: spec.name.to_string(),
            current_value: 0.0,
            threshold: spec.threshold,
            history: VecDeque::new(),
        }
    }

    fn push(&mut self, point: MetricPoint) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(point);
    }

    /// Number of retained history entries.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// History entries with timestamps inside `[since, until]`, in
    /// insertion order.
    ///
    /// Both bounds matter: explicit timestamps are accepted on record, so
    /// a point stamped ahead of the clock must not leak into every window.
    pub fn points_between(&self, since: Timestamp, until: Timestamp) -> Vec<MetricPoint> {
        self.history
            .iter()
            .filter(|p| p.timestamp >= since && p.timestamp <= until)
            .copied()
            .collect()
    }
}

/// A recorded value that exceeded the configured threshold.
#[derive(Debug, Clone)]
pub struct ThresholdBreach {
    pub category: MetricCategory,
    pub metric: String,
    pub value: f64,
    pub threshold: f64,
    pub severity: AlertSeverity,
}

/// Read-only view of one series for query responses.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSnapshot {
    pub category: MetricCategory,
    pub metric: String,
    pub current: f64,
    pub threshold: Option<f64>,
    pub history: Vec<MetricPoint>,
}

/// Process-wide registry of metric series.
pub struct TimeSeriesStore {
    series: HashMap<(MetricCategory, String), MetricSeries>,
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeriesStore {
    /// Seed a store with the fixed catalogue: every series starts with a
    /// current value of zero and an empty history.
    pub fn new() -> Self {
        let series = CATALOG
            .iter()
            .map(|spec| {
                (
                    (spec.category, spec.name.to_string()),
                    MetricSeries::from_spec(spec),
                )
            })
            .collect();
        Self { series }
    }

    /// Record one observation.
    ///
    /// Updates the current value, appends to history (evicting FIFO at
    /// capacity), and evaluates the configured threshold. Returns the breach
    /// when `value > threshold`: critical above
    /// [`CRITICAL_MULTIPLIER`] × threshold, warning otherwise.
    ///
    /// Unknown (category, metric) pairs are rejected with
    /// [`CoreError::UnknownMetric`]; the ingestion layer chooses whether to
    /// surface or swallow that.
    pub fn record(
        &mut self,
        category: MetricCategory,
        metric: &str,
        value: f64,
        timestamp: Timestamp,
    ) -> Result<Option<ThresholdBreach>, CoreError> {
        let series = self
            .series
            .get_mut(&(category, metric.to_string()))
            .ok_or_else(|| CoreError::UnknownMetric {
                category,
                metric: metric.to_string(),
            })?;

        series.current_value = value;
        series.push(MetricPoint { value, timestamp });

        let Some(threshold) = series.threshold else {
            return Ok(None);
        };
        if value <= threshold {
            return Ok(None);
        }

        let severity = if value > threshold * CRITICAL_MULTIPLIER {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        Ok(Some(ThresholdBreach {
            category,
            metric: metric.to_string(),
            value,
            threshold,
            severity,
        }))
    }

    /// Look up one series.
    pub fn series(&self, category: MetricCategory, metric: &str) -> Option<&MetricSeries> {
        self.series.get(&(category, metric.to_string()))
    }

    /// Current value of one series, if it exists in the catalogue.
    pub fn current(&self, category: MetricCategory, metric: &str) -> Option<f64> {
        self.series(category, metric).map(|s| s.current_value)
    }

    /// Snapshot all series (optionally scoped to one category) with history
    /// filtered to the closed window `[since, until]`.
    ///
    /// Results are sorted by (category, metric) so query responses are
    /// deterministic.
    pub fn snapshot(
        &self,
        category: Option<MetricCategory>,
        since: Timestamp,
        until: Timestamp,
    ) -> Vec<SeriesSnapshot> {
        let mut snapshots: Vec<SeriesSnapshot> = self
            .series
            .values()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .map(|s| SeriesSnapshot {
                category: s.category,
                metric: s.name.clone(),
                current: s.current_value,
                threshold: s.threshold,
                history: s.points_between(since, until),
            })
            .collect();
        snapshots.sort_by(|a, b| (a.category, &a.metric).cmp(&(b.category, &b.metric)));
        snapshots
    }
}
