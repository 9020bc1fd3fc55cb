//! Rolling-window analytics over store snapshots.
//!
//! [`AnalyticsEngine`] turns filtered metric history into per-metric summary
//! statistics, least-squares trends, z-score anomaly flags, and baseline
//! recommendations, bundled into immutable [`AnalyticsReport`]s retained by
//! id. Pure logic; the caller passes the store in.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{MetricCategory, METRIC_CPU, METRIC_DEVICES_OFFLINE, METRIC_DEVICES_ONLINE, METRIC_ERROR_RATE};
use crate::store::TimeSeriesStore;
use crate::timerange::parse_time_range;
use crate::types::{EntityId, Timestamp};

/// Minimum sample count before anomaly detection applies.
pub const MIN_ANOMALY_SAMPLES: usize = 10;

/// Number of trailing samples averaged for the anomaly recent-window mean.
pub const RECENT_WINDOW: usize = 5;

/// Deviation (in standard deviations) at which an anomaly is flagged.
const ANOMALY_SIGMA: f64 = 2.0;

/// Deviation at which a flagged anomaly is considered high severity.
const HIGH_ANOMALY_SIGMA: f64 = 4.0;

/// Slopes with an absolute value at or below this count as stable.
const SLOPE_EPSILON: f64 = 1e-9;

/// Window-average CPU above which a performance recommendation is issued.
const CPU_RECOMMENDATION_AVG: f64 = 70.0;

/// Window-average error rate above which a reliability recommendation is issued.
const ERROR_RATE_RECOMMENDATION_AVG: f64 = 2.0;

// ---------------------------------------------------------------------------
// Report payload types
// ---------------------------------------------------------------------------

/// Summary statistics for one metric over the report window.
///
/// A metric with no samples in the window reports the sentinel values
/// `average = min = max = 0` and `count = 0`; `current` still reflects the
/// last recorded value (zero for a never-recorded series).
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub category: MetricCategory,
    pub metric: String,
    pub current: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Least-squares trend for one metric; omitted entirely for metrics with
/// fewer than two samples in the window.
#[derive(Debug, Clone, Serialize)]
pub struct MetricTrend {
    pub category: MetricCategory,
    pub metric: String,
    /// Ordinary least-squares slope of value against sample index.
    ///
    /// Fitting against index rather than elapsed time is a known
    /// limitation: unevenly spaced samples are weighted equally.
    pub slope: f64,
    pub direction: TrendDirection,
    /// Percent change from the first to the last sample in the window;
    /// zero when the first sample is zero.
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Medium,
    High,
}

/// A recent-window deviation beyond two standard deviations of the
/// long-run mean.
#[derive(Debug, Clone, Serialize)]
pub struct MetricAnomaly {
    pub category: MetricCategory,
    pub metric: String,
    pub mean: f64,
    pub std_dev: f64,
    pub recent_mean: f64,
    /// Signed deviation of the recent mean from the long-run mean.
    pub deviation: f64,
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationArea {
    Performance,
    Reliability,
    Connectivity,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub area: RecommendationArea,
    pub message: String,
}

/// An immutable analytics report, retained by id once generated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub id: EntityId,
    pub time_range: String,
    pub categories: Vec<MetricCategory>,
    pub generated_at: Timestamp,
    pub summary: Vec<MetricSummary>,
    pub trends: Vec<MetricTrend>,
    pub anomalies: Vec<MetricAnomaly>,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Generates and retains analytics reports.
///
/// Retention is an unbounded append-only map; no expiry policy is defined.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    reports: HashMap<EntityId, AnalyticsReport>,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a report over `time_range` for the selected categories
    /// (`None` selects all), retain it, and return a copy.
    pub fn generate_report(
        &mut self,
        store: &TimeSeriesStore,
        time_range: &str,
        categories: Option<&[MetricCategory]>,
        now: Timestamp,
    ) -> AnalyticsReport {
        let categories: Vec<MetricCategory> = match categories {
            Some(selected) => selected.to_vec(),
            None => MetricCategory::ALL.to_vec(),
        };
        let since = now - parse_time_range(time_range);

        let mut summary = Vec::new();
        let mut trends = Vec::new();
        let mut anomalies = Vec::new();

        for category in &categories {
            for snapshot in store.snapshot(Some(*category), since, now) {
                let values: Vec<f64> = snapshot.history.iter().map(|p| p.value).collect();

                summary.push(summarize(
                    *category,
                    &snapshot.metric,
                    snapshot.current,
                    &values,
                ));
                if let Some(trend) = fit_trend(*category, &snapshot.metric, &values) {
                    trends.push(trend);
                }
                if let Some(anomaly) = detect_anomaly(*category, &snapshot.metric, &values) {
                    anomalies.push(anomaly);
                }
            }
        }

        let recommendations = baseline_recommendations(store, &summary);

        let report = AnalyticsReport {
            id: Uuid::new_v4(),
            time_range: time_range.to_string(),
            categories,
            generated_at: now,
            summary,
            trends,
            anomalies,
            recommendations,
        };
        self.reports.insert(report.id, report.clone());
        report
    }

    /// Look up a previously generated report.
    pub fn report(&self, id: EntityId) -> Option<&AnalyticsReport> {
        self.reports.get(&id)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around `mu`.
fn population_std_dev(values: &[f64], mu: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their indices.
///
/// `slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)`, with x = 0, 1, ..., n−1.
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

fn summarize(
    category: MetricCategory,
    metric: &str,
    current: f64,
    values: &[f64],
) -> MetricSummary {
    if values.is_empty() {
        return MetricSummary {
            category,
            metric: metric.to_string(),
            current,
            average: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
        };
    }

    MetricSummary {
        category,
        metric: metric.to_string(),
        current,
        average: mean(values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        count: values.len(),
    }
}

/// Fit a trend; metrics with fewer than two samples are omitted.
fn fit_trend(category: MetricCategory, metric: &str, values: &[f64]) -> Option<MetricTrend> {
    if values.len() < 2 {
        return None;
    }

    let slope = ols_slope(values);
    let direction = if slope > SLOPE_EPSILON {
        TrendDirection::Increasing
    } else if slope < -SLOPE_EPSILON {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    let first = values[0];
    let last = values[values.len() - 1];
    let change_percent = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };

    Some(MetricTrend {
        category,
        metric: metric.to_string(),
        slope,
        direction,
        change_percent,
    })
}

/// Flag an anomaly when the mean of the trailing [`RECENT_WINDOW`] samples
/// deviates from the window mean by more than two standard deviations.
///
/// Requires at least [`MIN_ANOMALY_SAMPLES`] samples; shorter series are
/// never flagged.
fn detect_anomaly(
    category: MetricCategory,
    metric: &str,
    values: &[f64],
) -> Option<MetricAnomaly> {
    if values.len() < MIN_ANOMALY_SAMPLES {
        return None;
    }

    let mu = mean(values);
    let sigma = population_std_dev(values, mu);
    let recent_mean = mean(&values[values.len() - RECENT_WINDOW..]);
    let deviation = recent_mean - mu;

    if deviation.abs() <= ANOMALY_SIGMA * sigma {
        return None;
    }

    let kind = if deviation > 0.0 {
        AnomalyKind::Spike
    } else {
        AnomalyKind::Drop
    };
    let severity = if deviation.abs() > HIGH_ANOMALY_SIGMA * sigma {
        AnomalySeverity::High
    } else {
        AnomalySeverity::Medium
    };

    Some(MetricAnomaly {
        category,
        metric: metric.to_string(),
        mean: mu,
        std_dev: sigma,
        recent_mean,
        deviation,
        kind,
        severity,
    })
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// The fixed baseline rule set, preserved for compatibility:
///
/// - window-average `system/cpu` above 70 -> performance
/// - window-average `application/error_rate` above 2 -> reliability
/// - current `devices/offline` above current `devices/online` -> connectivity
///
/// The CPU and error-rate rules evaluate over the summaries actually
/// selected for the report; the connectivity rule reads current values
/// straight from the store.
fn baseline_recommendations(
    store: &TimeSeriesStore,
    summary: &[MetricSummary],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let window_average = |category: MetricCategory, metric: &str| -> Option<f64> {
        summary
            .iter()
            .find(|s| s.category == category && s.metric == metric && s.count > 0)
            .map(|s| s.average)
    };

    if let Some(avg) = window_average(MetricCategory::System, METRIC_CPU) {
        if avg > CPU_RECOMMENDATION_AVG {
            recommendations.push(Recommendation {
                area: RecommendationArea::Performance,
                message: format!(
                    "Average CPU usage is {avg:.1}%; consider scaling out or \
                     shedding background load"
                ),
            });
        }
    }

    if let Some(avg) = window_average(MetricCategory::Application, METRIC_ERROR_RATE) {
        if avg > ERROR_RATE_RECOMMENDATION_AVG {
            recommendations.push(Recommendation {
                area: RecommendationArea::Reliability,
                message: format!(
                    "Average error rate is {avg:.1}/min; investigate recent \
                     failures and consider rolling back"
                ),
            });
        }
    }

    let online = store.current(MetricCategory::Devices, METRIC_DEVICES_ONLINE);
    let offline = store.current(MetricCategory::Devices, METRIC_DEVICES_OFFLINE);
    if let (Some(online), Some(offline)) = (online, offline) {
        if offline > online {
            recommendations.push(Recommendation {
                area: RecommendationArea::Connectivity,
                message: format!(
                    "More devices are offline ({offline:.0}) than online \
                     ({online:.0}); check fleet connectivity"
                ),
            });
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::catalog::{METRIC_MEMORY, METRIC_RESPONSE_TIME};

    fn seeded_store(metric_values: &[(MetricCategory, &str, &[f64])]) -> TimeSeriesStore {
        let mut store = TimeSeriesStore::new();
        let start = Utc::now() - Duration::minutes(30);
        for (category, metric, values) in metric_values {
            for (i, value) in values.iter().enumerate() {
                store
                    .record(*category, metric, *value, start + Duration::seconds(i as i64))
                    .unwrap();
            }
        }
        store
    }

    // --- statistics helpers ---

    #[test]
    fn ols_slope_of_strictly_increasing_series_is_positive() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((ols_slope(&values) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ols_slope_of_constant_series_is_zero() {
        let values = [3.0; 8];
        assert_eq!(ols_slope(&values), 0.0);
    }

    #[test]
    fn population_std_dev_matches_hand_computation() {
        // values 2, 4, 4, 4, 5, 5, 7, 9: mu = 5, sigma = 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mu = mean(&values);
        assert_eq!(mu, 5.0);
        assert_eq!(population_std_dev(&values, mu), 2.0);
    }

    // --- trends ---

    #[test]
    fn trend_slope_sign_matches_last_minus_first_for_monotonic_series() {
        let increasing = [1.0, 3.0, 4.0, 9.0];
        let decreasing = [9.0, 4.0, 3.0, 1.0];

        let up = fit_trend(MetricCategory::System, METRIC_CPU, &increasing).unwrap();
        let down = fit_trend(MetricCategory::System, METRIC_CPU, &decreasing).unwrap();

        assert_eq!(up.direction, TrendDirection::Increasing);
        assert!(up.slope > 0.0);
        assert_eq!(down.direction, TrendDirection::Decreasing);
        assert!(down.slope < 0.0);
    }

    #[test]
    fn trend_change_percent_guards_zero_first_sample() {
        let trend = fit_trend(MetricCategory::System, METRIC_CPU, &[0.0, 50.0]).unwrap();
        assert_eq!(trend.change_percent, 0.0);

        let trend = fit_trend(MetricCategory::System, METRIC_CPU, &[50.0, 75.0]).unwrap();
        assert_eq!(trend.change_percent, 50.0);
    }

    #[test]
    fn trend_requires_two_samples() {
        assert!(fit_trend(MetricCategory::System, METRIC_CPU, &[42.0]).is_none());
        assert!(fit_trend(MetricCategory::System, METRIC_CPU, &[]).is_none());
    }

    // --- anomalies ---

    #[test]
    fn anomaly_flagged_when_recent_mean_deviates_beyond_two_sigma() {
        // A long stable baseline then five samples far above it. With k
        // outliers in an n-sample window the deviation-to-sigma ratio is
        // sqrt((n - k) / k), so 25 + 5 gives sqrt(5) > 2.
        let mut values = vec![10.0; 25];
        values.extend([100.0; 5]);

        let anomaly =
            detect_anomaly(MetricCategory::Application, METRIC_RESPONSE_TIME, &values).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::Spike);
        assert_eq!(anomaly.severity, AnomalySeverity::Medium);
        assert!(anomaly.deviation > 0.0);
    }

    #[test]
    fn extreme_deviation_is_high_severity() {
        // 95 + 5 gives a deviation-to-sigma ratio of sqrt(18) > 4.
        let mut values = vec![10.0; 95];
        values.extend([100.0; 5]);

        let anomaly = detect_anomaly(MetricCategory::System, METRIC_CPU, &values).unwrap();
        assert_eq!(anomaly.severity, AnomalySeverity::High);
    }

    #[test]
    fn anomaly_drop_detected_by_sign() {
        let mut values = vec![100.0; 25];
        values.extend([1.0; 5]);

        let anomaly =
            detect_anomaly(MetricCategory::Application, METRIC_RESPONSE_TIME, &values).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::Drop);
    }

    #[test]
    fn anomaly_never_flagged_under_minimum_samples() {
        // Dramatic deviation, but only 9 samples.
        let mut values = vec![10.0; 4];
        values.extend([1000.0; 5]);
        assert_eq!(values.len(), 9);

        assert!(detect_anomaly(MetricCategory::System, METRIC_CPU, &values).is_none());
    }

    #[test]
    fn stable_series_is_not_anomalous() {
        let values = vec![10.0; 20];
        assert!(detect_anomaly(MetricCategory::System, METRIC_CPU, &values).is_none());
    }

    // --- reports ---

    #[test]
    fn report_on_never_recorded_metric_uses_sentinel_summary() {
        let store = TimeSeriesStore::new();
        let mut engine = AnalyticsEngine::new();

        let report = engine.generate_report(
            &store,
            "7d",
            Some(&[MetricCategory::System]),
            Utc::now(),
        );

        let cpu = report
            .summary
            .iter()
            .find(|s| s.metric == METRIC_CPU)
            .unwrap();
        assert_eq!(cpu.count, 0);
        assert_eq!(cpu.current, 0.0);
        assert_eq!(cpu.average, 0.0);
        assert_eq!(cpu.min, 0.0);
        assert_eq!(cpu.max, 0.0);

        // Too few samples: the metric is omitted from trends and anomalies.
        assert!(report.trends.iter().all(|t| t.metric != METRIC_CPU));
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn report_covers_selected_categories_only() {
        let store = seeded_store(&[(MetricCategory::System, METRIC_MEMORY, &[40.0, 45.0])]);
        let mut engine = AnalyticsEngine::new();

        let report =
            engine.generate_report(&store, "1h", Some(&[MetricCategory::System]), Utc::now());

        assert_eq!(report.categories, vec![MetricCategory::System]);
        assert!(report
            .summary
            .iter()
            .all(|s| s.category == MetricCategory::System));
    }

    #[test]
    fn report_is_retained_and_retrievable_by_id() {
        let store = TimeSeriesStore::new();
        let mut engine = AnalyticsEngine::new();

        let report = engine.generate_report(&store, "1h", None, Utc::now());
        let fetched = engine.report(report.id).unwrap();
        assert_eq!(fetched.id, report.id);
        assert_eq!(fetched.categories, MetricCategory::ALL.to_vec());

        assert!(engine.report(Uuid::new_v4()).is_none());
    }

    // --- recommendations ---

    #[test]
    fn high_average_cpu_yields_performance_recommendation() {
        let store = seeded_store(&[(
            MetricCategory::System,
            METRIC_CPU,
            &[72.0, 75.0, 78.0],
        )]);
        let mut engine = AnalyticsEngine::new();

        let report =
            engine.generate_report(&store, "1h", Some(&[MetricCategory::System]), Utc::now());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.area == RecommendationArea::Performance));
    }

    #[test]
    fn high_error_rate_yields_reliability_recommendation() {
        let store = seeded_store(&[(
            MetricCategory::Application,
            METRIC_ERROR_RATE,
            &[2.5, 3.0, 4.0],
        )]);
        let mut engine = AnalyticsEngine::new();

        let report = engine.generate_report(
            &store,
            "1h",
            Some(&[MetricCategory::Application]),
            Utc::now(),
        );
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.area == RecommendationArea::Reliability));
    }

    #[test]
    fn offline_majority_yields_connectivity_recommendation() {
        let store = seeded_store(&[
            (MetricCategory::Devices, METRIC_DEVICES_ONLINE, &[3.0]),
            (MetricCategory::Devices, METRIC_DEVICES_OFFLINE, &[7.0]),
        ]);
        let mut engine = AnalyticsEngine::new();

        let report =
            engine.generate_report(&store, "1h", Some(&[MetricCategory::Devices]), Utc::now());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.area == RecommendationArea::Connectivity));
    }

    #[test]
    fn healthy_window_produces_no_recommendations() {
        let store = seeded_store(&[
            (MetricCategory::System, METRIC_CPU, &[20.0, 25.0]),
            (MetricCategory::Devices, METRIC_DEVICES_ONLINE, &[9.0]),
            (MetricCategory::Devices, METRIC_DEVICES_OFFLINE, &[1.0]),
        ]);
        let mut engine = AnalyticsEngine::new();

        let report = engine.generate_report(&store, "1h", None, Utc::now());
        assert!(report.recommendations.is_empty());
    }
}
