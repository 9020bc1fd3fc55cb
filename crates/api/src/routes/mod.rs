pub mod alerts;
pub mod analytics;
pub mod dashboard;
pub mod devices;
pub mod health;
pub mod metrics;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /metrics                              record (POST), query (GET)
/// /alerts                               list (GET)
/// /alerts/{id}/acknowledge              acknowledge (POST)
/// /alerts/{id}/resolve                  resolve (POST)
/// /analytics/reports                    generate (POST)
/// /analytics/reports/{id}               retrieve (GET)
/// /devices/{device_id}/predictions      predict (POST), history (GET)
/// /dashboard/compose                    materialize widgets (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/metrics", metrics::router())
        .nest("/alerts", alerts::router())
        .nest("/analytics", analytics::router())
        .nest("/devices", devices::router())
        .nest("/dashboard", dashboard::router())
}
