//! Handlers for metric ingestion and queries.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vigil_core::catalog::MetricCategory;
use vigil_core::error::CoreError;
use vigil_core::store::SeriesSnapshot;
use vigil_core::types::Timestamp;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for recording one observation.
#[derive(Debug, Deserialize)]
pub struct RecordMetricRequest {
    pub category: MetricCategory,
    pub metric: String,
    pub value: f64,
    /// Defaults to the server clock when omitted.
    pub timestamp: Option<Timestamp>,
}

/// Query parameters for the metrics listing endpoint.
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// Scope to one category; omit for the whole catalogue.
    pub category: Option<MetricCategory>,
    /// History window, `<integer><unit>` with unit m/h/d/w (default: `1h`).
    #[serde(default = "default_range")]
    pub range: String,
}

fn default_range() -> String {
    "1h".to_string()
}

/// POST /metrics
///
/// Record one observation. Pairs outside the catalogue are logged and
/// ignored so producers never fail ingestion; threshold breaches raise
/// alerts as a side effect.
pub async fn record_metric(
    State(state): State<AppState>,
    Json(input): Json<RecordMetricRequest>,
) -> AppResult<StatusCode> {
    let mut monitor = state.monitor.lock().await;
    match monitor.record_metric(input.category, &input.metric, input.value, input.timestamp) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(CoreError::UnknownMetric { category, metric }) => {
            tracing::warn!(%category, %metric, "Ignoring observation for unknown metric");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /metrics
///
/// Snapshot current values and windowed history, optionally scoped to one
/// category. Malformed range strings degrade to the one-hour default.
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> AppResult<Json<DataResponse<Vec<SeriesSnapshot>>>> {
    let monitor = state.monitor.lock().await;
    let snapshots = monitor.metrics(query.category, &query.range);
    Ok(Json(DataResponse { data: snapshots }))
}
