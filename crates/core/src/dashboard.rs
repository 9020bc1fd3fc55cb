//! Dashboard widget contract.
//!
//! Widgets are pure reads over the time series store: a `metric` widget
//! materializes the current value, a `chart` widget the windowed history.
//! No computation beyond retrieval happens here.

use serde::{Deserialize, Serialize};

use crate::catalog::MetricCategory;
use crate::error::CoreError;
use crate::store::{MetricPoint, TimeSeriesStore};
use crate::timerange::parse_time_range;
use crate::types::Timestamp;

fn default_chart_range() -> String {
    "1h".to_string()
}

/// A widget requested by the dashboard renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetSpec {
    Metric {
        category: MetricCategory,
        metric: String,
    },
    Chart {
        category: MetricCategory,
        metric: String,
        #[serde(default = "default_chart_range")]
        time_range: String,
    },
}

/// A materialized widget payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetPayload {
    Metric {
        category: MetricCategory,
        metric: String,
        current: f64,
        threshold: Option<f64>,
    },
    Chart {
        category: MetricCategory,
        metric: String,
        time_range: String,
        points: Vec<MetricPoint>,
    },
}

/// Materialize a widget list against the store.
///
/// A widget referencing a pair outside the catalogue fails the whole
/// composition with [`CoreError::UnknownMetric`].
pub fn compose(
    store: &TimeSeriesStore,
    widgets: &[WidgetSpec],
    now: Timestamp,
) -> Result<Vec<WidgetPayload>, CoreError> {
    widgets
        .iter()
        .map(|widget| materialize(store, widget, now))
        .collect()
}

fn materialize(
    store: &TimeSeriesStore,
    widget: &WidgetSpec,
    now: Timestamp,
) -> Result<WidgetPayload, CoreError> {
    match widget {
        WidgetSpec::Metric { category, metric } => {
            let series =
                store
                    .series(*category, metric)
                    .ok_or_else(|| CoreError::UnknownMetric {
                        category: *category,
                        metric: metric.clone(),
                    })?;
            Ok(WidgetPayload::Metric {
                category: *category,
                metric: metric.clone(),
                current: series.current_value,
                threshold: series.threshold,
            })
        }
        WidgetSpec::Chart {
            category,
            metric,
            time_range,
        } => {
            let series =
                store
                    .series(*category, metric)
                    .ok_or_else(|| CoreError::UnknownMetric {
                        category: *category,
                        metric: metric.clone(),
                    })?;
            let since = now - parse_time_range(time_range);
            Ok(WidgetPayload::Chart {
                category: *category,
                metric: metric.clone(),
                time_range: time_range.clone(),
                points: series.points_between(since, now),
            })
        }
    }
}
