//! Bark-control engine
//!
//! [`BarkController`] keeps a log of accepted activations and a bark-until
//! deadline behind one lock. Transports call [`BarkController::activate`] and
//! [`BarkController::deactivate`]; the playback loop polls
//! [`BarkController::tick`]. All entry points take the current instant, so
//! decisions are reproducible under a fixed clock.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use woof_engine::{ActivationOutcome, BarkConfig, BarkController};
//! use woof_schedule::Schedule;
//!
//! let controller = BarkController::new(BarkConfig::default());
//! let now = Utc.with_ymd_and_hms(2017, 1, 23, 20, 0, 0).unwrap();
//!
//! assert_eq!(controller.activate(now), ActivationOutcome::FreshStart);
//! assert!(controller.tick(&now, &Schedule::default()));
//! ```

pub mod config;
pub mod controller;

pub use config::{BarkConfig, MAX_HORIZON_MINUTES, MAX_RESOLUTION_SECS};
pub use controller::{ActivationOutcome, BarkController, ControllerSnapshot, RETENTION};
