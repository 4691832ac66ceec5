//! Unified error handling for woofie services
//!
//! Domain crates keep their own error enums (`ScheduleError`, `SoundError`);
//! binaries and the service layer convert them into [`WoofError`] and use its
//! category to decide how loudly to log.

use thiserror::Error;
use woof_schedule::ScheduleError;
use woof_sounds::SoundError;

// ============================================================================
// WoofError - Main error type
// ============================================================================

/// Main error type for woofie services
#[derive(Debug, Error)]
pub enum WoofError {
    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    // ======================================
    // Audio Errors
    // ======================================
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

    // ======================================
    // Transport Errors
    // ======================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {transport}: {message}")]
    Transport { transport: String, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // ======================================
    // Service & Runtime Errors
    // ======================================
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using WoofError
pub type WoofResult<T> = Result<T, WoofError>;

impl WoofError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(transport: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            transport: transport.into(),
            message: message.to_string(),
        }
    }

    /// Stable code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Schedule(_) => "SCHEDULE_ERROR",
            Self::Sound(SoundError::EmptyLibrary) => "EMPTY_LIBRARY",
            Self::Sound(_) => "SOUND_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::InvalidConfig { .. } | Self::Schedule(_) => {
                ErrorCategory::Configuration
            },

            Self::Sound(SoundError::Io { .. } | SoundError::EmptyLibrary) => {
                ErrorCategory::Configuration
            },
            // Decode and output failures can also happen mid-run
            Self::Sound(_) => ErrorCategory::Playback,

            Self::Io(_) | Self::Transport { .. } => ErrorCategory::Network,
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Internal => Level::ERROR,
            ErrorCategory::Playback | ErrorCategory::Network | ErrorCategory::Protocol => {
                Level::WARN
            },
        }
    }

    /// Log at [`Self::log_level`], prefixed with `context`
    pub fn log(&self, context: &str) {
        match self.log_level() {
            tracing::Level::ERROR => {
                tracing::error!("{}: [{}] {}", context, self.error_code(), self)
            },
            _ => tracing::warn!("{}: {}", context, self),
        }
    }
}

impl From<figment::Error> for WoofError {
    fn from(err: figment::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

// Helper macros for creating errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::WoofError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::WoofError::Configuration(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! protocol_error {
    ($msg:expr) => {
        $crate::WoofError::Protocol($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::WoofError::Protocol(format!($fmt, $($arg)*))
    };
}

/// Error category enum - used for log level selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fatal at startup
    Configuration,
    /// Audio device or decode failure while playing
    Playback,
    Network,
    /// Malformed inbound trigger
    Protocol,
    Internal,
}

// Tests
#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_schedule_error_is_configuration() {
        let err: WoofError = ScheduleError::invalid_day("9").into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.error_code(), "SCHEDULE_ERROR");
        assert_eq!(err.to_string(), "Schedule error: Invalid day: 9");
        assert_eq!(err.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_sound_error_categories() {
        let empty: WoofError = SoundError::EmptyLibrary.into();
        assert_eq!(empty.category(), ErrorCategory::Configuration);
        assert_eq!(empty.error_code(), "EMPTY_LIBRARY");

        let output: WoofError = SoundError::Output("no device".into()).into();
        assert_eq!(output.category(), ErrorCategory::Playback);
        assert_eq!(output.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_macros() {
        let err = config_error!("bad port {}", 0);
        assert_eq!(err.to_string(), "Configuration error: bad port 0");

        let err = protocol_error!("Invalid packet size 3");
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }

    #[test]
    fn test_internal_is_error_level() {
        let err = WoofError::Internal("task panicked".into());
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.log_level(), tracing::Level::ERROR);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_log_uses_category_level() {
        protocol_error!("Invalid packet size 3").log("Dropped packet");
        assert!(logs_contain("WARN"));
        assert!(logs_contain("Dropped packet: Protocol error: Invalid packet size 3"));

        WoofError::from(SoundError::EmptyLibrary).log("Startup failed");
        assert!(logs_contain("ERROR"));
        assert!(logs_contain(
            "Startup failed: [EMPTY_LIBRARY] Sound error: No sounds in library"
        ));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = WoofError::invalid_config("factor", "must be 0-100");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: factor: must be 0-100"
        );
    }
}
