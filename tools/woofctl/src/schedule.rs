//! Schedule preview

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Args;
use colored::*;
use woof_schedule::Schedule;

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Schedule, e.g. "1-5=11-19,6=12-17"
    pub spec: String,

    /// Check a local time, "YYYY-MM-DD HH:MM"
    #[arg(long)]
    pub at: Option<String>,
}

pub fn handle(args: ScheduleArgs) -> Result<()> {
    print!("{}", render(&args)?);
    Ok(())
}

fn render(args: &ScheduleArgs) -> Result<String> {
    let schedule = Schedule::parse(&args.spec)
        .with_context(|| format!("Invalid schedule '{}'", args.spec))?;

    let mut out = String::new();
    out.push_str(&schedule.dump());
    writeln!(out, "{} {}", "Canonical:".bold(), schedule.to_spec())?;

    if let Some(at) = &args.at {
        let instant = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M")
            .with_context(|| format!("Invalid time '{}', expected YYYY-MM-DD HH:MM", at))?;
        let verdict = if schedule.in_schedule(&instant) {
            "quiet".yellow()
        } else {
            "barking allowed".green()
        };
        writeln!(out, "{} {}", instant.format("%a %Y-%m-%d %H:%M:"), verdict)?;
    }
    Ok(out)
}
