//! Controller parameters

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest bark segment one activation can buy
pub const MAX_RESOLUTION_SECS: u64 = 24 * 60 * 60;

/// Longest score horizon, one day
pub const MAX_HORIZON_MINUTES: i64 = 24 * 60;

/// Immutable scoring parameters for a [`crate::BarkController`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarkConfig {
    /// Seconds an accepted activation extends the bark deadline
    pub resolution_secs: u64,
    /// Minutes back from now that activations contribute to the score
    pub horizon_minutes: i64,
    /// Score at or above which activations are suppressed
    pub score_ceiling: i64,
    /// Chance (0.0-1.0) a suppressed activation is accepted anyway
    pub override_probability: f64,
}

impl Default for BarkConfig {
    fn default() -> Self {
        Self {
            resolution_secs: 15,
            horizon_minutes: 30,
            score_ceiling: 150,
            override_probability: 0.05,
        }
    }
}

impl BarkConfig {
    /// Bark segment length, clamped to `1..=MAX_RESOLUTION_SECS` seconds
    pub fn resolution(&self) -> Duration {
        let secs = self.resolution_secs.clamp(1, MAX_RESOLUTION_SECS);
        Duration::seconds(secs as i64)
    }

    /// Score horizon in minutes, clamped to `0..=MAX_HORIZON_MINUTES`
    pub fn horizon(&self) -> i64 {
        self.horizon_minutes.clamp(0, MAX_HORIZON_MINUTES)
    }
}
