//! Route definitions for metric ingestion and queries.

use axum::routing::post;
use axum::Router;

use crate::handlers::metrics;
use crate::state::AppState;

/// Routes mounted at `/metrics`.
///
/// ```text
/// POST /        -> record_metric
/// GET  /        -> get_metrics
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(metrics::record_metric).get(metrics::get_metrics))
}
