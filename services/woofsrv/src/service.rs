//! Glue between the triggers and the bark controller
//!
//! Triggers only ever call [`BarkService::woof_on`] and
//! [`BarkService::woof_off`]. The service stamps the current time, drives the
//! controller and logs what it decided.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use woof_engine::{ActivationOutcome, BarkController};
use woof_schedule::Schedule;

use crate::clock::Clock;

/// Name reported by `/health`
pub const SERVICE_NAME: &str = "woofsrv";

/// Current state as reported by `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub service: &'static str,
    pub barking: bool,
    pub quiet_hours: bool,
    pub bark_until: DateTime<Utc>,
    pub logged_activations: usize,
}

pub struct BarkService {
    controller: Arc<BarkController>,
    schedule: Arc<Schedule>,
    clock: Arc<dyn Clock>,
}

impl BarkService {
    pub fn new(
        controller: Arc<BarkController>,
        schedule: Arc<Schedule>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            controller,
            schedule,
            clock,
        }
    }

    pub fn controller(&self) -> &Arc<BarkController> {
        &self.controller
    }

    pub fn schedule(&self) -> &Arc<Schedule> {
        &self.schedule
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Authenticated "on" signal
    pub fn woof_on(&self) -> ActivationOutcome {
        let now = self.clock.now().with_timezone(&Utc);
        let outcome = self.controller.activate(now);
        match outcome {
            ActivationOutcome::FreshStart => info!("Started fresh bark cycle"),
            ActivationOutcome::Accepted { score } => info!("Authorizing bark at score={}", score),
            ActivationOutcome::Overridden { score } => {
                info!("Authorizing bark at score={} (ignoring the log)", score)
            },
            ActivationOutcome::Suppressed { score } => {
                info!("Too much barking; shutting up for a while (score={})", score)
            },
        }
        outcome
    }

    /// Authenticated "off" signal
    pub fn woof_off(&self) {
        let now = self.clock.now().with_timezone(&Utc);
        self.controller.deactivate(now);
        info!("Explicit disable of bark cycle");
    }

    pub fn status(&self) -> ServiceStatus {
        let now = self.clock.now();
        let snapshot = self.controller.snapshot(now.with_timezone(&Utc));
        let quiet_hours = self.schedule.in_schedule(&now);
        debug!(?snapshot, quiet_hours, "Status requested");
        ServiceStatus {
            service: SERVICE_NAME,
            barking: snapshot.barking && !quiet_hours,
            quiet_hours,
            bark_until: snapshot.bark_until,
            logged_activations: snapshot.logged_activations,
        }
    }
}
