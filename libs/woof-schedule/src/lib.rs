//! Weekly quiet-hours schedule
//!
//! Parses compact specs such as `"1-5=09:00-17:00,6=12-15"` into
//! per-weekday quiet windows and answers whether an instant falls inside
//! any of them.
//!
//! ```
//! use woof_schedule::Schedule;
//!
//! let schedule: Schedule = "6=12-17".parse().unwrap();
//! assert_eq!(schedule.dump(), " Saturday: 12:00-17:00\n");
//! ```

pub mod error;
pub mod parser;
pub mod schedule;

pub use error::{Result, ScheduleError};
pub use parser::ScheduleParser;
pub use schedule::{weekday_from_index, weekday_name, ClockTime, QuietWindow, Schedule};
