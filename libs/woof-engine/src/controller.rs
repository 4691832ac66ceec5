//! Bark controller
//!
//! Owns the activation log and the bark-until deadline behind a single
//! lock. Every operation takes an explicit `now`; nothing here reads the
//! clock or does I/O.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use woof_schedule::Schedule;

use crate::config::BarkConfig;

/// Activations older than this are dropped from the log
///
/// Independent of [`BarkConfig::horizon_minutes`].
pub const RETENTION: Duration = Duration::hours(1);

/// Result of a single [`BarkController::activate`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActivationOutcome {
    /// Log was empty after pruning
    FreshStart,
    /// Score below the ceiling
    Accepted { score: i64 },
    /// Score at or above the ceiling, accepted by the override draw
    Overridden { score: i64 },
    /// Rejected; only pruning happened
    Suppressed { score: i64 },
}

impl ActivationOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Suppressed { .. })
    }

    pub fn score(&self) -> Option<i64> {
        match self {
            Self::FreshStart => None,
            Self::Accepted { score } | Self::Overridden { score } | Self::Suppressed { score } => {
                Some(*score)
            }
        }
    }
}

/// Read-only view of the controller for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub bark_until: DateTime<Utc>,
    pub barking: bool,
    pub logged_activations: usize,
}

/// Everything the lock guards
struct BarkState {
    log: VecDeque<DateTime<Utc>>,
    bark_until: DateTime<Utc>,
    rng: StdRng,
}

impl BarkState {
    fn prune(&mut self, now: DateTime<Utc>) {
        while let Some(&oldest) = self.log.front() {
            if now - oldest > RETENTION {
                self.log.pop_front();
            } else {
                break;
            }
        }
    }

    /// Sum of `horizon - age` over distinct whole-minute ages below the horizon
    fn score(&self, now: DateTime<Utc>, horizon: i64) -> i64 {
        let buckets: HashSet<i64> = self
            .log
            .iter()
            .map(|&t| (now - t).num_minutes())
            .filter(|&age| age < horizon)
            .collect();
        buckets.into_iter().map(|age| horizon - age).sum()
    }

    fn accept(&mut self, now: DateTime<Utc>, resolution: Duration) {
        self.bark_until = now + resolution;
        self.log.push_back(now);
    }
}

/// Anti-flood bark controller
pub struct BarkController {
    config: BarkConfig,
    state: Mutex<BarkState>,
}

impl BarkController {
    pub fn new(config: BarkConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic override draws, for tests
    pub fn with_seed(config: BarkConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BarkConfig, rng: StdRng) -> Self {
        Self {
            config,
            state: Mutex::new(BarkState {
                log: VecDeque::new(),
                bark_until: DateTime::<Utc>::UNIX_EPOCH,
                rng,
            }),
        }
    }

    pub fn config(&self) -> &BarkConfig {
        &self.config
    }

    /// Record an activation request and decide whether it starts barking
    pub fn activate(&self, now: DateTime<Utc>) -> ActivationOutcome {
        let mut state = self.state.lock();
        state.prune(now);

        if state.log.is_empty() {
            state.accept(now, self.config.resolution());
            return ActivationOutcome::FreshStart;
        }

        let score = state.score(now, self.config.horizon());
        let outcome = if score < self.config.score_ceiling {
            ActivationOutcome::Accepted { score }
        } else if state.rng.gen::<f64>() < self.config.override_probability {
            ActivationOutcome::Overridden { score }
        } else {
            return ActivationOutcome::Suppressed { score };
        };

        state.accept(now, self.config.resolution());
        outcome
    }

    /// Stop barking now; the log is left alone
    pub fn deactivate(&self, now: DateTime<Utc>) {
        self.state.lock().bark_until = now;
    }

    /// Whether the player should be running at `now`
    ///
    /// Quiet hours are checked against the wall-clock time of `now` in its
    /// own zone.
    pub fn tick<Tz: TimeZone>(&self, now: &DateTime<Tz>, schedule: &Schedule) -> bool {
        if schedule.in_schedule(&now.naive_local()) {
            return false;
        }
        let now = now.with_timezone(&Utc);
        self.state.lock().bark_until > now
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ControllerSnapshot {
        let state = self.state.lock();
        ControllerSnapshot {
            bark_until: state.bark_until,
            barking: state.bark_until > now,
            logged_activations: state.log.len(),
        }
    }
}

impl std::fmt::Debug for BarkController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BarkController")
            .field("config", &self.config)
            .field("bark_until", &state.bark_until)
            .field("logged_activations", &state.log.len())
            .finish()
    }
}
