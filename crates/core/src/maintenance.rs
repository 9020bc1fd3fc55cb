//! Rule-based failure prediction for monitored devices.
//!
//! [`PredictiveMaintenanceEngine`] evaluates a device sensor snapshot
//! against independent per-signal threshold rules and appends the resulting
//! [`Prediction`] to the device's history. Escalation to the alert registry
//! is the caller's job; [`ComponentPrediction::needs_escalation`] encodes
//! the bound.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{EntityId, Timestamp};

const DAY_MS: i64 = 86_400_000;

/// Device temperature (Celsius) above which overheating is predicted.
pub const TEMPERATURE_LIMIT: f64 = 80.0;

/// Vibration level above which bearing wear is predicted.
pub const VIBRATION_LIMIT: f64 = 100.0;

/// Current draw (amps) above which a power supply overload is predicted.
pub const CURRENT_LIMIT: f64 = 2.0;

/// Overall prediction confidence.
///
/// Fixed regardless of which rules fired; a heuristic placeholder carried
/// over from the reference rule set.
pub const OVERALL_CONFIDENCE: f64 = 0.75;

/// Failure probability above which a component prediction escalates to an
/// alert.
pub const ESCALATION_PROBABILITY: f64 = 0.8;

/// Time-to-failure bound (ms) below which an escalation-probability
/// prediction escalates to an alert.
pub const ESCALATION_WINDOW_MS: i64 = 7 * DAY_MS;

/// One sensor snapshot reported for a device. Absent signals are skipped.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SensorData {
    pub temperature: Option<f64>,
    pub vibration: Option<f64>,
    pub current: Option<f64>,
}

/// Device component a rule predicts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    TemperatureSensor,
    Motor,
    PowerSupply,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::TemperatureSensor => "temperature_sensor",
            Component::Motor => "motor",
            Component::PowerSupply => "power_supply",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The failure mode a rule predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Overheating,
    BearingWear,
    Overload,
}

impl FailureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Overheating => "overheating",
            FailureMode::BearingWear => "bearing_wear",
            FailureMode::Overload => "overload",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triggered rule's output.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentPrediction {
    pub component: Component,
    pub failure_mode: FailureMode,
    /// Estimated failure probability in [0, 1].
    pub probability: f64,
    /// Estimated time until failure, in milliseconds.
    pub time_to_failure_ms: i64,
    /// Per-rule confidence in [0, 1].
    pub confidence: f64,
}

impl ComponentPrediction {
    /// Whether this prediction must raise a predictive alert: probability
    /// above [`ESCALATION_PROBABILITY`] with failure expected inside
    /// [`ESCALATION_WINDOW_MS`].
    pub fn needs_escalation(&self) -> bool {
        self.probability > ESCALATION_PROBABILITY && self.time_to_failure_ms < ESCALATION_WINDOW_MS
    }
}

/// The full prediction produced for one sensor snapshot. Immutable once
/// created; appended to the per-device history.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub id: EntityId,
    pub device_id: String,
    pub timestamp: Timestamp,
    pub predictions: Vec<ComponentPrediction>,
    /// Overall confidence; always [`OVERALL_CONFIDENCE`].
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

/// Owns per-device prediction histories.
///
/// Histories are unbounded append-only logs; no archival policy is defined.
#[derive(Debug, Default)]
pub struct PredictiveMaintenanceEngine {
    history: HashMap<String, Vec<Prediction>>,
}

impl PredictiveMaintenanceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one sensor snapshot and append the prediction to the
    /// device's history.
    pub fn predict(&mut self, device_id: &str, sensors: SensorData, now: Timestamp) -> Prediction {
        let mut predictions = Vec::new();
        let mut recommendations = Vec::new();

        if let Some(temperature) = sensors.temperature {
            if temperature > TEMPERATURE_LIMIT {
                predictions.push(ComponentPrediction {
                    component: Component::TemperatureSensor,
                    failure_mode: FailureMode::Overheating,
                    probability: 0.85,
                    time_to_failure_ms: 2 * DAY_MS,
                    confidence: 0.8,
                });
                recommendations.push(format!(
                    "Temperature on {device_id} is {temperature:.1}C; inspect cooling and \
                     reduce load"
                ));
            }
        }

        if let Some(vibration) = sensors.vibration {
            if vibration > VIBRATION_LIMIT {
                predictions.push(ComponentPrediction {
                    component: Component::Motor,
                    failure_mode: FailureMode::BearingWear,
                    probability: 0.70,
                    time_to_failure_ms: 5 * DAY_MS,
                    confidence: 0.75,
                });
                recommendations.push(format!(
                    "Vibration on {device_id} is {vibration:.1}; schedule motor bearing \
                     inspection"
                ));
            }
        }

        if let Some(current) = sensors.current {
            if current > CURRENT_LIMIT {
                predictions.push(ComponentPrediction {
                    component: Component::PowerSupply,
                    failure_mode: FailureMode::Overload,
                    probability: 0.60,
                    time_to_failure_ms: 7 * DAY_MS,
                    confidence: 0.70,
                });
                recommendations.push(format!(
                    "Current draw on {device_id} is {current:.2}A; check for short circuits \
                     and overloaded peripherals"
                ));
            }
        }

        let prediction = Prediction {
            id: Uuid::new_v4(),
            device_id: device_id.to_string(),
            timestamp: now,
            predictions,
            confidence: OVERALL_CONFIDENCE,
            recommendations,
        };

        self.history
            .entry(device_id.to_string())
            .or_default()
            .push(prediction.clone());

        prediction
    }

    /// Prediction history for a device, oldest first. Unknown devices have
    /// an empty history.
    pub fn history(&self, device_id: &str) -> &[Prediction] {
        self.history.get(device_id).map_or(&[], Vec::as_slice)
    }
}
