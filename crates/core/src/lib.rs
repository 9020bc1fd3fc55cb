//! Core domain logic for the vigil monitoring service.
//!
//! Covers metric time series with bounded history, threshold alerting,
//! rolling-window analytics (summary statistics, least-squares trends,
//! z-score anomaly detection), rule-based predictive maintenance, and the
//! dashboard data contract.
//!
//! Pure logic with no network or storage access. The only outward-facing
//! side effect is the injected [`notify::AlertSink`] capability.

pub mod alert;
pub mod analytics;
pub mod catalog;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod maintenance;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod timerange;
pub mod types;
