//! Route definitions for dashboard composition.

use axum::routing::post;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// POST /compose   -> compose
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/compose", post(dashboard::compose))
}
