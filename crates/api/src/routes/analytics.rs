//! Route definitions for analytics reports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// POST /reports        -> generate_report
/// GET  /reports/{id}   -> get_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", post(analytics::generate_report))
        .route("/reports/{id}", get(analytics::get_report))
}
