//! Error types for woof-schedule

use thiserror::Error;

/// Schedule parsing errors
///
/// Parsing is all-or-nothing: the first bad clause aborts the whole spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Empty schedule")]
    Empty,

    #[error("Bad schedule clause: '{0}'")]
    MalformedClause(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Invalid day range: {start}-{end}")]
    ReversedDayRange { start: u32, end: u32 },

    #[error("Invalid interval: '{0}'")]
    MalformedInterval(String),

    #[error("Invalid time: '{0}'")]
    InvalidTime(String),

    #[error("Pattern error: {0}")]
    Pattern(String),
}

impl ScheduleError {
    pub fn malformed_clause(clause: impl Into<String>) -> Self {
        Self::MalformedClause(clause.into())
    }

    pub fn invalid_day(day: impl Into<String>) -> Self {
        Self::InvalidDay(day.into())
    }

    pub fn malformed_interval(interval: impl Into<String>) -> Self {
        Self::MalformedInterval(interval.into())
    }

    pub fn invalid_time(time: impl Into<String>) -> Self {
        Self::InvalidTime(time.into())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
