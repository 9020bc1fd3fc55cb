//! Route definitions for the alert lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET  /                    -> list_alerts
/// POST /{id}/acknowledge    -> acknowledge_alert
/// POST /{id}/resolve        -> resolve_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts))
        .route("/{id}/acknowledge", post(alerts::acknowledge_alert))
        .route("/{id}/resolve", post(alerts::resolve_alert))
}
