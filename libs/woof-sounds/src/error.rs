//! Error types for woof-sounds

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("No sounds in library")]
    EmptyLibrary,
}

impl SoundError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SoundError>;
