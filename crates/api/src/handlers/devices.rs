//! Handlers for the predictive maintenance endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vigil_core::maintenance::{Prediction, SensorData};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /devices/{device_id}/predictions
///
/// Run the failure prediction rules against one sensor snapshot. High-risk
/// component predictions raise predictive alerts as a side effect.
pub async fn predict(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Json(sensors): Json<SensorData>,
) -> AppResult<(StatusCode, Json<DataResponse<Prediction>>)> {
    let mut monitor = state.monitor.lock().await;
    let prediction = monitor.predict(&device_id, sensors);
    Ok((StatusCode::CREATED, Json(DataResponse { data: prediction })))
}

/// GET /devices/{device_id}/predictions
///
/// Prediction history for one device, oldest first. Devices that never
/// reported have an empty history.
pub async fn prediction_history(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Prediction>>>> {
    let monitor = state.monitor.lock().await;
    let history = monitor.prediction_history(&device_id);
    Ok(Json(DataResponse { data: history }))
}
