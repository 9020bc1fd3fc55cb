/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Alerts, reports, and predictions are keyed by random UUIDs.
pub type EntityId = uuid::Uuid;
