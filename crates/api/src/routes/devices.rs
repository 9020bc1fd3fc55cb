//! Route definitions for predictive maintenance.

use axum::routing::post;
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// POST /{device_id}/predictions   -> predict
/// GET  /{device_id}/predictions   -> prediction_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{device_id}/predictions",
        post(devices::predict).get(devices::prediction_history),
    )
}
