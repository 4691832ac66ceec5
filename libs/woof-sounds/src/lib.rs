//! Bark sample library
//!
//! Scans a directory for `.flac` clips, keeps their stream metadata and
//! plays a random one on request through a [`SamplePlayer`].

pub mod error;
pub mod library;
pub mod player;

pub use error::{Result, SoundError};
pub use library::{Sample, SampleLibrary, SAMPLE_EXTENSION};
pub use player::{RodioPlayer, SamplePlayer};
