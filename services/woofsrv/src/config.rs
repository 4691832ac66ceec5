//! Service configuration
//!
//! Layered with figment, lowest to highest priority:
//! built-in defaults → optional YAML file (`--config`) → `WOOF_*` environment
//! variables → explicit command-line flags.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use errors::{config_error, WoofError, WoofResult};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use woof_engine::{BarkConfig, MAX_HORIZON_MINUTES, MAX_RESOLUTION_SECS};
use woof_schedule::{Schedule, ScheduleError, ScheduleParser};

/// Default HTTP/UDP port
pub const DEFAULT_PORT: u16 = 40080;

/// Schedule value that disables quiet hours entirely
pub const NO_SCHEDULE: &str = "none";

/// Which network trigger listens for on/off signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    #[default]
    Http,
    Udp,
}

impl std::fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Udp => f.write_str("udp"),
        }
    }
}

/// Command-line arguments
///
/// Every flag is optional so that only flags given explicitly override the
/// lower configuration layers.
#[derive(Parser, Debug, Clone, Default, Serialize)]
#[command(name = "woofsrv", version)]
#[command(about = "Plays random bark samples when triggered over the network")]
pub struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "WOOF_CONFIG")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Directory with FLAC files inside [default: .]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub woofdir: Option<PathBuf>,

    /// Quiet hours, e.g. "1-5=09:00-17:00", or "none" [default: 1-5=09:00-17:00]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    /// Seconds a bark segment lasts before checking again [default: 15]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u64>,

    /// Minutes to look back in the activation log [default: 30]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon: Option<i64>,

    /// Score at which we shut up for a while [default: 150]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,

    /// Percent chance to bark anyway when the score says not to [default: 5]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<u32>,

    /// Port to serve on [default: 40080]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Path prefix, HTTP only [default: /]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Preshared password, UDP only [default: "bow wow"]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,

    /// Log to stderr, syslog or a file name [default: stderr]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,

    /// Network trigger to use [default: http]
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TriggerMode>,

    /// Log level when RUST_LOG is unset [default: info]
    #[arg(short = 'l', long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Validate configuration, schedule and sample library, then exit
    #[arg(long)]
    #[serde(skip)]
    pub validate: bool,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoofConfig {
    pub woofdir: PathBuf,
    pub schedule: String,
    pub resolution: u64,
    pub horizon: i64,
    pub score: i64,
    pub factor: u32,
    pub port: u16,
    pub path: String,
    pub pass: String,
    pub log: String,
    pub mode: TriggerMode,
    pub log_level: String,
}

impl Default for WoofConfig {
    fn default() -> Self {
        Self {
            woofdir: PathBuf::from("."),
            schedule: "1-5=09:00-17:00".to_string(),
            resolution: 15,
            horizon: 30,
            score: 150,
            factor: 5,
            port: DEFAULT_PORT,
            path: "/".to_string(),
            pass: "bow wow".to_string(),
            log: "stderr".to_string(),
            mode: TriggerMode::Http,
            log_level: "info".to_string(),
        }
    }
}

impl WoofConfig {
    /// Build the provider stack for `args`
    pub fn figment(args: &Args) -> WoofResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(WoofConfig::default()));

        if let Some(path) = &args.config {
            figment = figment.merge(Self::yaml_file(path)?);
        }

        Ok(figment
            .merge(Env::prefixed("WOOF_"))
            .merge(Serialized::defaults(args)))
    }

    fn yaml_file(path: &Path) -> WoofResult<figment::providers::Data<Yaml>> {
        if !path.is_file() {
            return Err(config_error!("Config file not found: {}", path.display()));
        }
        Ok(Yaml::file(path))
    }

    /// Resolve all layers and validate the result
    pub fn load(args: &Args) -> WoofResult<Self> {
        let config: WoofConfig = Self::figment(args)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller or transports cannot work with
    pub fn validate(&self) -> WoofResult<()> {
        if !(1..=MAX_RESOLUTION_SECS).contains(&self.resolution) {
            return Err(WoofError::invalid_config(
                "resolution",
                format!(
                    "{} is not between 1 and {} seconds",
                    self.resolution, MAX_RESOLUTION_SECS
                ),
            ));
        }
        if !(1..=MAX_HORIZON_MINUTES).contains(&self.horizon) {
            return Err(WoofError::invalid_config(
                "horizon",
                format!(
                    "{} is not between 1 and {} minutes",
                    self.horizon, MAX_HORIZON_MINUTES
                ),
            ));
        }
        if self.score <= 0 {
            return Err(WoofError::invalid_config("score", "must be positive"));
        }
        if self.factor > 100 {
            return Err(WoofError::invalid_config(
                "factor",
                format!("{} is not a percentage (0-100)", self.factor),
            ));
        }
        if self.woofdir.as_os_str().is_empty() {
            return Err(WoofError::invalid_config("woofdir", "must not be empty"));
        }
        if self.port == 0 {
            return Err(WoofError::invalid_config("port", "must not be 0"));
        }
        if self.mode == TriggerMode::Udp && self.pass.is_empty() {
            return Err(WoofError::invalid_config(
                "pass",
                "UDP trigger needs a preshared password",
            ));
        }
        Ok(())
    }

    /// Controller parameters
    pub fn bark_config(&self) -> BarkConfig {
        BarkConfig {
            resolution_secs: self.resolution,
            horizon_minutes: self.horizon,
            score_ceiling: self.score,
            override_probability: f64::from(self.factor) / 100.0,
        }
    }

    /// Quiet-hours schedule; `none` yields an empty schedule
    pub fn quiet_schedule(&self) -> Result<Schedule, ScheduleError> {
        if self.schedule.trim().eq_ignore_ascii_case(NO_SCHEDULE) {
            return Ok(Schedule::default());
        }
        ScheduleParser::new()?.parse(&self.schedule)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WoofConfig::default();
        config.validate().unwrap();

        let bark = config.bark_config();
        assert_eq!(bark.resolution_secs, 15);
        assert_eq!(bark.horizon_minutes, 30);
        assert_eq!(bark.score_ceiling, 150);
        assert!((bark.override_probability - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            (
                WoofConfig {
                    resolution: 0,
                    ..Default::default()
                },
                "resolution",
            ),
            (
                WoofConfig {
                    resolution: 1 << 60,
                    ..Default::default()
                },
                "resolution",
            ),
            (
                WoofConfig {
                    horizon: 0,
                    ..Default::default()
                },
                "horizon",
            ),
            (
                WoofConfig {
                    horizon: i64::MAX,
                    ..Default::default()
                },
                "horizon",
            ),
            (
                WoofConfig {
                    score: 0,
                    ..Default::default()
                },
                "score",
            ),
            (
                WoofConfig {
                    factor: 101,
                    ..Default::default()
                },
                "factor",
            ),
            (
                WoofConfig {
                    woofdir: PathBuf::new(),
                    ..Default::default()
                },
                "woofdir",
            ),
            (
                WoofConfig {
                    port: 0,
                    ..Default::default()
                },
                "port",
            ),
            (
                WoofConfig {
                    mode: TriggerMode::Udp,
                    pass: String::new(),
                    ..Default::default()
                },
                "pass",
            ),
        ];

        for (config, field) in cases {
            match config.validate() {
                Err(WoofError::InvalidConfig { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{field}: expected InvalidConfig, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let config = WoofConfig {
            resolution: MAX_RESOLUTION_SECS,
            horizon: MAX_HORIZON_MINUTES,
            ..Default::default()
        };
        config.validate().unwrap();

        let config = WoofConfig {
            resolution: MAX_RESOLUTION_SECS + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_pass_fine_in_http_mode() {
        let config = WoofConfig {
            pass: String::new(),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_flags_override_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("woofie.yaml");
        std::fs::write(
            &path,
            "schedule: \"6=12-17\"\nport: 5000\nfactor: 20\nmode: udp\n",
        )
        .unwrap();

        let args = Args {
            config: Some(path),
            port: Some(6000),
            ..Default::default()
        };
        let config = WoofConfig::load(&args).unwrap();

        assert_eq!(config.schedule, "6=12-17");
        assert_eq!(config.factor, 20);
        assert_eq!(config.mode, TriggerMode::Udp);
        assert_eq!(config.port, 6000);
        // Untouched keys keep their defaults
        assert_eq!(config.resolution, 15);
        assert_eq!(config.pass, "bow wow");
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/woofie.yaml")),
            ..Default::default()
        };
        assert!(matches!(
            WoofConfig::load(&args),
            Err(WoofError::Configuration(_))
        ));
    }

    #[test]
    fn test_quiet_schedule() {
        let config = WoofConfig {
            schedule: "None".to_string(),
            ..Default::default()
        };
        assert!(config.quiet_schedule().unwrap().is_empty());

        let config = WoofConfig::default();
        assert_eq!(config.quiet_schedule().unwrap().len(), 5);

        let config = WoofConfig {
            schedule: "8=1-2".to_string(),
            ..Default::default()
        };
        assert!(config.quiet_schedule().is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "woofsrv",
            "--mode",
            "udp",
            "--pass",
            "secret",
            "--factor",
            "0",
            "--validate",
        ]);
        assert_eq!(args.mode, Some(TriggerMode::Udp));
        assert_eq!(args.pass.as_deref(), Some("secret"));
        assert_eq!(args.factor, Some(0));
        assert!(args.validate);
        assert!(args.schedule.is_none());
    }
}
