//! HTTP layer for the vigil monitoring service.
//!
//! Maps the core monitoring operations 1:1 onto a JSON REST API: metric
//! ingestion and queries, alert lifecycle, analytics reports, predictive
//! maintenance, and dashboard composition.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
