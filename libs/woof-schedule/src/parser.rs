//! Schedule spec parser
//!
//! Grammar: `CLAUSE(,CLAUSE)*` where `CLAUSE = DAYSPEC=TIMERANGE`,
//! `DAYSPEC = D | D-D` (0 = Sunday), `TIMERANGE = TIME-TIME` and
//! `TIME = H | HH | H:MM | HH:MM`. Whitespace around separators is ignored.

use regex::Regex;

use crate::error::{Result, ScheduleError};
use crate::schedule::{weekday_from_index, ClockTime, QuietWindow, Schedule};

/// Compiled patterns for the schedule grammar
///
/// Build once and reuse; parsing itself is pure.
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    clause_sep: Regex,
    assign_sep: Regex,
    range_sep: Regex,
    bare_hour: Regex,
    hour_minute: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScheduleError::Pattern(e.to_string()))
}

impl ScheduleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            clause_sep: compile(r"\s*,\s*")?,
            assign_sep: compile(r"\s*=\s*")?,
            range_sep: compile(r"\s*-\s*")?,
            bare_hour: compile(r"^\d\d?$")?,
            hour_minute: compile(r"^(\d\d?):(\d\d)$")?,
        })
    }

    /// Parse a full spec into a sorted [`Schedule`]
    ///
    /// The first bad clause fails the whole parse.
    pub fn parse(&self, spec: &str) -> Result<Schedule> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let mut windows = Vec::new();
        for clause in self.clause_sep.split(spec) {
            self.parse_clause(clause, &mut windows)?;
        }
        Ok(Schedule::from_windows(windows))
    }

    fn parse_clause(&self, clause: &str, out: &mut Vec<QuietWindow>) -> Result<()> {
        let parts: Vec<&str> = self.assign_sep.split(clause.trim()).collect();
        let [days, interval] = parts.as_slice() else {
            return Err(ScheduleError::malformed_clause(clause));
        };
        if days.is_empty() || interval.is_empty() {
            return Err(ScheduleError::malformed_clause(clause));
        }

        let (first, last) = self.parse_days(days)?;
        let (start, end) = self.parse_interval(interval)?;

        for index in first..=last {
            let weekday = weekday_from_index(index)
                .ok_or_else(|| ScheduleError::invalid_day(index.to_string()))?;
            out.push(QuietWindow::new(weekday, start, end));
        }
        Ok(())
    }

    /// `D` or `D-D`, returned as an inclusive index range
    pub fn parse_days(&self, days: &str) -> Result<(u32, u32)> {
        let parts: Vec<&str> = self.range_sep.split(days.trim()).collect();
        match parts.as_slice() {
            [single] => {
                let day = parse_day(single)?;
                Ok((day, day))
            }
            [first, last] => {
                let (start, end) = (parse_day(first)?, parse_day(last)?);
                if start > end {
                    return Err(ScheduleError::ReversedDayRange { start, end });
                }
                Ok((start, end))
            }
            _ => Err(ScheduleError::invalid_day(days)),
        }
    }

    /// `TIME-TIME`
    ///
    /// A start later than the end is accepted; such a window never matches.
    pub fn parse_interval(&self, interval: &str) -> Result<(ClockTime, ClockTime)> {
        let parts: Vec<&str> = self.range_sep.split(interval.trim()).collect();
        let [start, end] = parts.as_slice() else {
            return Err(ScheduleError::malformed_interval(interval));
        };
        Ok((self.parse_time(start)?, self.parse_time(end)?))
    }

    /// `H`, `HH`, `H:MM` or `HH:MM`
    pub fn parse_time(&self, time: &str) -> Result<ClockTime> {
        let time = time.trim();

        let (hour, minute) = if self.bare_hour.is_match(time) {
            (parse_number(time, time)?, 0)
        } else if let Some(caps) = self.hour_minute.captures(time) {
            (parse_number(&caps[1], time)?, parse_number(&caps[2], time)?)
        } else {
            return Err(ScheduleError::invalid_time(time));
        };

        if hour > 23 || minute > 59 {
            return Err(ScheduleError::invalid_time(time));
        }
        Ok(ClockTime::new(hour, minute))
    }
}

fn parse_day(day: &str) -> Result<u32> {
    match day.trim().parse::<u32>() {
        Ok(index) if index <= 6 => Ok(index),
        _ => Err(ScheduleError::invalid_day(day)),
    }
}

fn parse_number(digits: &str, context: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|_| ScheduleError::invalid_time(context))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use chrono::Weekday;

    fn parser() -> ScheduleParser {
        ScheduleParser::new().unwrap()
    }

    #[test]
    fn test_parse_time_forms() {
        let p = parser();
        assert_eq!(p.parse_time("9").unwrap(), ClockTime::new(9, 0));
        assert_eq!(p.parse_time("09").unwrap(), ClockTime::new(9, 0));
        assert_eq!(p.parse_time("8:30").unwrap(), ClockTime::new(8, 30));
        assert_eq!(p.parse_time(" 23:59 ").unwrap(), ClockTime::new(23, 59));
    }

    #[test]
    fn test_parse_time_rejects_out_of_range() {
        let p = parser();
        assert_eq!(p.parse_time("24"), Err(ScheduleError::invalid_time("24")));
        assert_eq!(p.parse_time("12:60"), Err(ScheduleError::invalid_time("12:60")));
        assert!(p.parse_time("12:5").is_err());
        assert!(p.parse_time("123").is_err());
        assert!(p.parse_time("noon").is_err());
    }

    #[test]
    fn test_parse_days() {
        let p = parser();
        assert_eq!(p.parse_days("3").unwrap(), (3, 3));
        assert_eq!(p.parse_days("1 - 5").unwrap(), (1, 5));
        assert_eq!(
            p.parse_days("5-1"),
            Err(ScheduleError::ReversedDayRange { start: 5, end: 1 })
        );
        assert!(matches!(p.parse_days("7"), Err(ScheduleError::InvalidDay(_))));
        assert!(matches!(p.parse_days("1-2-3"), Err(ScheduleError::InvalidDay(_))));
    }

    #[test]
    fn test_range_expands_per_day() {
        let schedule = parser().parse("1-3=10-11").unwrap();
        let days: Vec<Weekday> = schedule.windows().iter().map(QuietWindow::weekday).collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]);
    }

    #[test]
    fn test_whitespace_insignificant() {
        let p = parser();
        let spaced = p.parse("  1 - 5 = 09:00 - 17:00 ,  6=12-15 ").unwrap();
        let tight = p.parse("1-5=09:00-17:00,6=12-15").unwrap();
        assert_eq!(spaced, tight);
    }

    #[test]
    fn test_malformed_input_fails_whole_parse() {
        let p = parser();
        assert_eq!(p.parse(""), Err(ScheduleError::Empty));
        assert_eq!(p.parse("   "), Err(ScheduleError::Empty));
        assert!(matches!(p.parse("1-5"), Err(ScheduleError::MalformedClause(_))));
        assert!(matches!(p.parse("1=2=3"), Err(ScheduleError::MalformedClause(_))));
        assert!(matches!(p.parse("1=9-10,"), Err(ScheduleError::MalformedClause(_))));
        assert!(matches!(p.parse("1=9"), Err(ScheduleError::MalformedInterval(_))));
        assert!(matches!(p.parse("1=9-10,2=25-26"), Err(ScheduleError::InvalidTime(_))));
    }

    #[test]
    fn test_reversed_interval_accepted() {
        let schedule = parser().parse("1=17-9").unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.windows()[0].start_hour(), 17);
        assert_eq!(schedule.windows()[0].end_hour(), 9);
    }
}
