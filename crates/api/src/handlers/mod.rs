pub mod alerts;
pub mod analytics;
pub mod dashboard;
pub mod devices;
pub mod metrics;
