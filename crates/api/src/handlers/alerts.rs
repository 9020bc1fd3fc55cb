//! Handlers for the alert lifecycle endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use vigil_core::alert::{Alert, AlertStatus};
use vigil_core::types::EntityId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the alert listing endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// `active` (default), `resolved`, or `all`.
    #[serde(default)]
    pub status: AlertStatus,
    /// Maximum number of alerts returned (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// GET /alerts
///
/// List alerts matching the status filter, newest first.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let monitor = state.monitor.lock().await;
    let alerts = monitor.alerts(query.status, query.limit);
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /alerts/{id}/acknowledge
///
/// Idempotent; unknown ids map to 404.
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let mut monitor = state.monitor.lock().await;
    let alert = monitor.acknowledge_alert(id)?;
    Ok(Json(DataResponse { data: alert }))
}

/// POST /alerts/{id}/resolve
///
/// Idempotent and independent of acknowledgement; unknown ids map to 404.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let mut monitor = state.monitor.lock().await;
    let alert = monitor.resolve_alert(id)?;
    Ok(Json(DataResponse { data: alert }))
}
