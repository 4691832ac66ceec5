//! Quiet windows and the weekly schedule built from them

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{Datelike, Timelike, Weekday};

use crate::error::{Result, ScheduleError};
use crate::parser::ScheduleParser;

/// Day indices used by the schedule grammar (0 = Sunday)
pub const DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Map a grammar day index (0 = Sunday .. 6 = Saturday) to a weekday
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    DAYS.get(index as usize).copied()
}

/// Full English weekday name, as rendered by [`Schedule::dump`]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Hour/minute pair as written in a schedule spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

/// A single quiet interval on one weekday
///
/// No wrap past midnight. The end bound is compared as a same-day clock
/// time, see [`QuietWindow::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    weekday: Weekday,
    start: ClockTime,
    end: ClockTime,
}

impl QuietWindow {
    pub fn new(weekday: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self {
            weekday,
            start,
            end,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start_hour(&self) -> u32 {
        self.start.hour
    }

    pub fn start_minute(&self) -> u32 {
        self.start.minute
    }

    pub fn end_hour(&self) -> u32 {
        self.end.hour
    }

    pub fn end_minute(&self) -> u32 {
        self.end.minute
    }

    /// Check whether `t` falls inside this window
    ///
    /// Known quirk, kept as-is: the end check rejects `hour > end_hour` but,
    /// on the end hour itself, rejects only minutes *before* `end_minute`.
    /// So for `11:00-19:00` the whole 19:xx hour still matches, and for
    /// `09:00-17:30` the minutes 17:00-17:29 do not.
    pub fn contains<T: Datelike + Timelike>(&self, t: &T) -> bool {
        if t.weekday() != self.weekday {
            return false;
        }

        let (hour, minute) = (t.hour(), t.minute());
        if hour < self.start.hour || (hour == self.start.hour && minute < self.start.minute) {
            return false;
        }
        if hour > self.end.hour || (hour == self.end.hour && minute < self.end.minute) {
            return false;
        }
        true
    }

    fn sort_key(&self) -> (u32, u32, u32) {
        (
            self.weekday.num_days_from_sunday(),
            self.start.hour,
            self.start.minute,
        )
    }
}

/// Weekly quiet-hours schedule
///
/// Windows are kept sorted by (weekday, start hour, start minute) with
/// insertion order preserved on ties. Immutable after construction, so it
/// can be shared behind an `Arc` without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    windows: Vec<QuietWindow>,
}

impl Schedule {
    /// Parse a schedule spec such as `"1-5=09:00-17:00,6=12-15"`
    pub fn parse(spec: &str) -> Result<Self> {
        ScheduleParser::new()?.parse(spec)
    }

    pub fn from_windows(mut windows: Vec<QuietWindow>) -> Self {
        // sort_by_key is stable, ties keep insertion order
        windows.sort_by_key(QuietWindow::sort_key);
        Self { windows }
    }

    pub fn windows(&self) -> &[QuietWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// True if any window contains `t`
    pub fn in_schedule<T: Datelike + Timelike>(&self, t: &T) -> bool {
        self.windows.iter().any(|w| w.contains(t))
    }

    /// Multi-line breakdown, one `"<weekday>: HH:MM-HH:MM"` line per window
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for w in &self.windows {
            let _ = writeln!(
                out,
                "{:>9}: {:02}:{:02}-{:02}:{:02}",
                weekday_name(w.weekday),
                w.start.hour,
                w.start.minute,
                w.end.hour,
                w.end.minute
            );
        }
        out
    }

    /// Render back to the schedule grammar, one clause per window
    pub fn to_spec(&self) -> String {
        self.windows
            .iter()
            .map(|w| {
                format!(
                    "{}={:02}:{:02}-{:02}:{:02}",
                    w.weekday.num_days_from_sunday(),
                    w.start.hour,
                    w.start.minute,
                    w.end.hour,
                    w.end.minute
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    // 2017-01-23 is a Monday
    fn monday(hh: u32, mm: u32) -> chrono::NaiveDateTime {
        at(2017, 1, 23, hh, mm)
    }

    #[test]
    fn test_boundary_semantics() {
        let window = QuietWindow::new(Weekday::Mon, ClockTime::new(11, 0), ClockTime::new(19, 0));

        assert!(window.contains(&monday(11, 0)));
        assert!(window.contains(&monday(19, 0)));
        assert!(!window.contains(&monday(10, 59)));
        assert!(!window.contains(&at(2017, 1, 24, 12, 0)));
    }

    #[test]
    fn test_end_hour_quirk() {
        // Whole end hour matches when end_minute is 0
        let window = QuietWindow::new(Weekday::Mon, ClockTime::new(11, 0), ClockTime::new(19, 0));
        assert!(window.contains(&monday(19, 45)));
        assert!(!window.contains(&monday(20, 0)));

        // Minutes before end_minute on the end hour are rejected
        let window = QuietWindow::new(Weekday::Mon, ClockTime::new(9, 0), ClockTime::new(17, 30));
        assert!(!window.contains(&monday(17, 15)));
        assert!(window.contains(&monday(17, 30)));
        assert!(window.contains(&monday(16, 59)));
    }

    #[test]
    fn test_windows_sorted_stably() {
        let a = QuietWindow::new(Weekday::Mon, ClockTime::new(12, 0), ClockTime::new(17, 0));
        let b = QuietWindow::new(Weekday::Sun, ClockTime::new(3, 0), ClockTime::new(10, 0));
        let c = QuietWindow::new(Weekday::Mon, ClockTime::new(12, 0), ClockTime::new(13, 0));
        let d = QuietWindow::new(Weekday::Mon, ClockTime::new(8, 30), ClockTime::new(11, 0));

        let schedule = Schedule::from_windows(vec![a, b, c, d]);
        assert_eq!(schedule.windows(), &[b, d, a, c]);
    }

    #[test]
    fn test_empty_schedule_never_quiet() {
        let schedule = Schedule::default();
        assert!(schedule.is_empty());
        assert!(!schedule.in_schedule(&monday(12, 0)));
        assert_eq!(schedule.dump(), "");
        assert_eq!(schedule.to_spec(), "");
    }

    #[test]
    fn test_weekday_index_mapping() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }
}
