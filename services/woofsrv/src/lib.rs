//! woofsrv - network-triggered door-bark simulator
//!
//! A trigger (HTTP or UDP) feeds on/off signals into the [`BarkService`],
//! which drives the anti-flood controller. The [`PlaybackLoop`] plays random
//! samples while the controller says to bark and quiet hours allow it.

pub mod clock;
pub mod config;
pub mod player;
pub mod service;
pub mod trigger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Args, TriggerMode, WoofConfig, DEFAULT_PORT};
pub use player::{PlaybackAction, PlaybackLoop};
pub use service::{BarkService, ServiceStatus};
pub use trigger::{HttpTrigger, UdpTrigger, WoofTrigger};
