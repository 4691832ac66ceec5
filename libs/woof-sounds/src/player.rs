//! Audio output

use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::error::{Result, SoundError};
use crate::library::{open_decoder, Sample};

/// Something that can play a clip to completion
///
/// `play` blocks; async callers should run it on a blocking thread.
pub trait SamplePlayer: Send + Sync {
    fn play(&self, sample: &Sample) -> Result<()>;
}

/// Plays clips on the default output device
///
/// The device is opened per clip. If opening fails it is retried once after
/// a short pause, which recovers from a backend that went away between clips.
#[derive(Debug, Clone)]
pub struct RodioPlayer {
    reopen_delay: Duration,
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self {
            reopen_delay: Duration::from_millis(200),
        }
    }
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_output(&self) -> Result<(OutputStream, OutputStreamHandle)> {
        match OutputStream::try_default() {
            Ok(output) => Ok(output),
            Err(_) => {
                thread::sleep(self.reopen_delay);
                OutputStream::try_default().map_err(|e| SoundError::Output(e.to_string()))
            },
        }
    }
}

impl SamplePlayer for RodioPlayer {
    fn play(&self, sample: &Sample) -> Result<()> {
        let source = open_decoder(&sample.path)?;

        // Stream must outlive the sink
        let (_stream, handle) = self.open_output()?;
        let sink = Sink::try_new(&handle).map_err(|e| SoundError::Playback(e.to_string()))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
