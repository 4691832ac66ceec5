//! Playback loop
//!
//! One long-lived task polls the controller and plays clips back to back
//! while the bark deadline lasts.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio_util::sync::CancellationToken;
use errors::{WoofError, WoofResult};
use tracing::{debug, info};
use woof_sounds::{SampleLibrary, SamplePlayer};

use crate::service::BarkService;

/// Sleep between polls when not barking
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What one iteration of the loop decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Idle,
    Quiet,
}

pub struct PlaybackLoop {
    service: Arc<BarkService>,
    library: Arc<SampleLibrary>,
    player: Arc<dyn SamplePlayer>,
    poll_interval: Duration,
}

impl PlaybackLoop {
    pub fn new(
        service: Arc<BarkService>,
        library: Arc<SampleLibrary>,
        player: Arc<dyn SamplePlayer>,
    ) -> Self {
        Self {
            service,
            library,
            player,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn step(&self, now: &DateTime<FixedOffset>) -> PlaybackAction {
        if self.service.schedule().in_schedule(&now.naive_local()) {
            return PlaybackAction::Quiet;
        }
        if self.service.controller().tick(now, self.service.schedule()) {
            PlaybackAction::Play
        } else {
            PlaybackAction::Idle
        }
    }

    /// Run until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            "Playback loop started with {} samples",
            self.library.len()
        );

        let mut last = None;
        while !shutdown.is_cancelled() {
            let now = self.service.clock().now();
            let action = self.step(&now);
            if last != Some(action) {
                debug!("Playback state: {:?}", action);
                last = Some(action);
            }

            if action == PlaybackAction::Play {
                match self.play_one().await {
                    Ok(sample) => {
                        debug!("Played {}", sample);
                        continue;
                    },
                    Err(e) => e.log("Playback failed"),
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {},
            }
        }

        info!("Playback loop stopped");
    }

    /// Play one random clip off the runtime
    async fn play_one(&self) -> WoofResult<String> {
        let library = Arc::clone(&self.library);
        let player = Arc::clone(&self.player);
        tokio::task::spawn_blocking(move || {
            library
                .play_random(player.as_ref())
                .map(|sample| sample.to_string())
        })
        .await
        .map_err(|e| WoofError::Internal(format!("Playback task failed: {}", e)))?
        .map_err(WoofError::from)
    }
}
