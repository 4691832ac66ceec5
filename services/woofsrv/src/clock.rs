//! Wall-clock source for the service layer
//!
//! The engine never reads the clock itself; everything above it gets `now`
//! from a [`Clock`] so tests can pin time.

use chrono::{DateTime, Duration, FixedOffset, Local};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Current instant in the zone quiet hours are written for
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}
