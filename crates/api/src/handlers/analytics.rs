//! Handlers for analytics report generation and retrieval.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vigil_core::analytics::AnalyticsReport;
use vigil_core::catalog::MetricCategory;
use vigil_core::types::EntityId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for report generation.
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    /// Report window (default: `7d`).
    #[serde(default = "default_time_range")]
    pub time_range: String,
    /// `["all"]` (default) or an explicit category list.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_time_range() -> String {
    "7d".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["all".to_string()]
}

/// Resolve the request's category selection: `"all"` anywhere in the list
/// selects every category; otherwise each entry must name a known category.
/// Repeated names collapse to their first occurrence so a report never
/// carries duplicate per-metric entries.
fn resolve_categories(names: &[String]) -> Result<Option<Vec<MetricCategory>>, AppError> {
    if names.iter().any(|n| n == "all") {
        return Ok(None);
    }
    let mut categories = names
        .iter()
        .map(|n| n.parse::<MetricCategory>())
        .collect::<Result<Vec<_>, _>>()?;
    let mut seen = std::collections::HashSet::new();
    categories.retain(|c| seen.insert(*c));
    if categories.is_empty() {
        return Err(AppError::BadRequest(
            "categories must not be empty".to_string(),
        ));
    }
    Ok(Some(categories))
}

/// POST /analytics/reports
///
/// Generate and retain a report over the requested window and categories.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(input): Json<GenerateReportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AnalyticsReport>>)> {
    let categories = resolve_categories(&input.categories)?;

    let mut monitor = state.monitor.lock().await;
    let report = monitor.generate_report(&input.time_range, categories.as_deref());
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /analytics/reports/{id}
///
/// Retrieve a previously generated report; unknown ids map to 404.
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<AnalyticsReport>>> {
    let monitor = state.monitor.lock().await;
    let report = monitor.report(id)?;
    Ok(Json(DataResponse { data: report }))
}
