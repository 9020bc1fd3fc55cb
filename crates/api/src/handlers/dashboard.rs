//! Handler for dashboard widget composition.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vigil_core::dashboard::{WidgetPayload, WidgetSpec};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for dashboard composition.
#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub widgets: Vec<WidgetSpec>,
}

/// POST /dashboard/compose
///
/// Materialize a widget list against the store. A widget naming a pair
/// outside the catalogue fails the whole composition with 404.
pub async fn compose(
    State(state): State<AppState>,
    Json(input): Json<ComposeRequest>,
) -> AppResult<Json<DataResponse<Vec<WidgetPayload>>>> {
    let monitor = state.monitor.lock().await;
    let payloads = monitor.compose_dashboard(&input.widgets)?;
    Ok(Json(DataResponse { data: payloads }))
}
