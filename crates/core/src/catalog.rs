//! The fixed metric catalogue and canonical metric name constants.
//!
//! The catalogue enumerates every (category, metric) pair the service
//! accepts. It is validated at store construction; recording against a pair
//! that is not listed here yields [`CoreError::UnknownMetric`](crate::error::CoreError).
//! Dynamic registration of new metrics is deliberately unsupported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level grouping for metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    System,
    Application,
    Devices,
    Projects,
}

impl MetricCategory {
    /// All categories, in canonical order.
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::System,
        MetricCategory::Application,
        MetricCategory::Devices,
        MetricCategory::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::System => "system",
            MetricCategory::Application => "application",
            MetricCategory::Devices => "devices",
            MetricCategory::Projects => "projects",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(MetricCategory::System),
            "application" => Ok(MetricCategory::Application),
            "devices" => Ok(MetricCategory::Devices),
            "projects" => Ok(MetricCategory::Projects),
            other => Err(CoreError::Validation(format!(
                "Unknown metric category: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical metric names
// ---------------------------------------------------------------------------

/// Host CPU utilization percentage (0-100).
pub const METRIC_CPU: &str = "cpu";

/// Host memory utilization percentage (0-100).
pub const METRIC_MEMORY: &str = "memory";

/// Host disk utilization percentage (0-100).
pub const METRIC_DISK: &str = "disk";

/// Inbound network throughput (KB/s).
pub const METRIC_NETWORK_IN: &str = "network_in";

/// Outbound network throughput (KB/s).
pub const METRIC_NETWORK_OUT: &str = "network_out";

/// Mean API response time in milliseconds.
pub const METRIC_RESPONSE_TIME: &str = "response_time";

/// Application errors per minute.
pub const METRIC_ERROR_RATE: &str = "error_rate";

/// Requests served per minute.
pub const METRIC_REQUESTS: &str = "requests";

/// Concurrently active user sessions.
pub const METRIC_ACTIVE_USERS: &str = "active_users";

/// Number of devices currently reporting.
pub const METRIC_DEVICES_ONLINE: &str = "online";

/// Number of devices that have dropped off.
pub const METRIC_DEVICES_OFFLINE: &str = "offline";

/// Fleet-wide mean device temperature in degrees Celsius.
pub const METRIC_DEVICE_TEMPERATURE: &str = "temperature";

/// Total projects on the platform.
pub const METRIC_PROJECTS_TOTAL: &str = "total";

/// Projects with activity in the current window.
pub const METRIC_PROJECTS_ACTIVE: &str = "active";

/// Circuit generations completed.
pub const METRIC_GENERATIONS: &str = "generations";

// ---------------------------------------------------------------------------
// Catalogue seed
// ---------------------------------------------------------------------------

/// One entry of the fixed catalogue.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub category: MetricCategory,
    pub name: &'static str,
    /// Alerting threshold; `None` disables threshold checks for the series.
    pub threshold: Option<f64>,
}

/// The fixed catalogue every store instance is seeded with.
pub const CATALOG: &[SeriesSpec] = &[
    SeriesSpec {
        category: MetricCategory::System,
        name: METRIC_CPU,
        threshold: Some(80.0),
    },
    SeriesSpec {
        category: MetricCategory::System,
        name: METRIC_MEMORY,
        threshold: Some(85.0),
    },
    SeriesSpec {
        category: MetricCategory::System,
        name: METRIC_DISK,
        threshold: Some(90.0),
    },
    SeriesSpec {
        category: MetricCategory::System,
        name: METRIC_NETWORK_IN,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::System,
        name: METRIC_NETWORK_OUT,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Application,
        name: METRIC_RESPONSE_TIME,
        threshold: Some(1000.0),
    },
    SeriesSpec {
        category: MetricCategory::Application,
        name: METRIC_ERROR_RATE,
        threshold: Some(5.0),
    },
    SeriesSpec {
        category: MetricCategory::Application,
        name: METRIC_REQUESTS,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Application,
        name: METRIC_ACTIVE_USERS,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Devices,
        name: METRIC_DEVICES_ONLINE,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Devices,
        name: METRIC_DEVICES_OFFLINE,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Devices,
        name: METRIC_DEVICE_TEMPERATURE,
        threshold: Some(75.0),
    },
    SeriesSpec {
        category: MetricCategory::Projects,
        name: METRIC_PROJECTS_TOTAL,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Projects,
        name: METRIC_PROJECTS_ACTIVE,
        threshold: None,
    },
    SeriesSpec {
        category: MetricCategory::Projects,
        name: METRIC_GENERATIONS,
        threshold: None,
    },
];
