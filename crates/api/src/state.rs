use std::sync::Arc;

use tokio::sync::Mutex;
use vigil_core::monitor::Monitor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The monitoring context. All state is in-memory; the mutex serializes
    /// concurrent writes so history and current values never lose updates.
    pub monitor: Arc<Mutex<Monitor>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
