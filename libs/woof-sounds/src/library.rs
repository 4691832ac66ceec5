//! Directory scan and random selection

use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use rodio::{Decoder, Source};

use crate::error::{Result, SoundError};
use crate::player::SamplePlayer;

/// File name suffix a clip must carry to be picked up by a scan
pub const SAMPLE_EXTENSION: &str = ".flac";

/// One playable clip and its stream metadata
///
/// Audio data is not kept in memory; the file is decoded again on play.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: Option<Duration>,
}

impl Sample {
    /// Open the file and read its stream header
    pub fn probe(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let decoder = open_decoder(&path)?;
        Ok(Self {
            sample_rate: decoder.sample_rate(),
            channels: decoder.channels(),
            duration: decoder.total_duration(),
            path,
        })
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} Hz, {} ch",
            self.file_name(),
            self.sample_rate,
            self.channels
        )?;
        match self.duration {
            Some(d) => write!(f, ", {:.2} secs)", d.as_secs_f32()),
            None => write!(f, ")"),
        }
    }
}

pub(crate) fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| SoundError::io(path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::decode(path, e))
}

/// Every clip found in the bark directory, sorted by file name
///
/// Read-only after [`SampleLibrary::scan`], so it can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct SampleLibrary {
    samples: Vec<Sample>,
}

impl SampleLibrary {
    /// Probe every `*.flac` entry of `dir`
    ///
    /// Other entries are skipped. A clip that cannot be decoded fails the
    /// whole scan, and so does a directory without any clips.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SoundError::io(dir, e))? {
            let entry = entry.map_err(|e| SoundError::io(dir, e))?;
            let is_sample = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(SAMPLE_EXTENSION));
            if is_sample {
                paths.push(entry.path());
            }
        }
        if paths.is_empty() {
            return Err(SoundError::EmptyLibrary);
        }
        paths.sort();

        let samples = paths
            .into_iter()
            .map(Sample::probe)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { samples })
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Uniformly random clip, `None` when empty
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Sample> {
        self.samples.choose(rng)
    }

    /// Play one random clip to completion and return it
    pub fn play_random<P: SamplePlayer + ?Sized>(&self, player: &P) -> Result<&Sample> {
        let sample = self
            .choose(&mut rand::thread_rng())
            .ok_or(SoundError::EmptyLibrary)?;
        player.play(sample)?;
        Ok(sample)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(name: &str) -> Sample {
        Sample {
            path: PathBuf::from("/barks").join(name),
            sample_rate: 44_100,
            channels: 1,
            duration: Some(Duration::from_millis(1500)),
        }
    }

    #[test]
    fn test_choose_empty() {
        let library = SampleLibrary::default();
        assert!(library.choose(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_choose_covers_all_samples() {
        let library = SampleLibrary::from_samples(vec![sample("a.flac"), sample("b.flac")]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 2];
        for _ in 0..64 {
            let chosen = library.choose(&mut rng).unwrap();
            let index = library.samples().iter().position(|s| s == chosen).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample("woof.flac").to_string(),
            "woof.flac (44100 Hz, 1 ch, 1.50 secs)"
        );
        let unknown = Sample {
            duration: None,
            ..sample("grr.flac")
        };
        assert_eq!(unknown.to_string(), "grr.flac (44100 Hz, 1 ch)");
    }
}
