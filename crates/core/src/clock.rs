//! Injectable time source.
//!
//! All domain operations read the current time through [`Clock`] so tests
//! can pin timestamps instead of racing against the wall clock.

use chrono::Utc;

use crate::types::Timestamp;

/// Provides the current UTC time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock implementation used by the production binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Fixed clock for unit tests; `advance` moves it forward explicitly.
#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<Timestamp>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}
