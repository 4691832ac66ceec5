//! woofctl - client tool for woofsrv
//!
//! Sends on/off triggers over UDP or HTTP and previews quiet-hour schedules.

mod http;
mod schedule;
mod udp;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

#[derive(Parser)]
#[command(name = "woofctl")]
#[command(about = "Trigger and inspect a woofsrv door-bark simulator")]
#[command(long_about = "Trigger and inspect a woofsrv door-bark simulator

Examples:
  woofctl udp --on --off                     # Bark for one segment, then stop
  woofctl http --url http://door:40080/ --on # Trigger over HTTP
  woofctl schedule '1-5=11-19' --at '2017-01-23 12:00'")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send digest packets to a UDP trigger
    Udp(udp::UdpArgs),

    /// Call an HTTP trigger
    Http(http::HttpArgs),

    /// Parse a schedule and show its windows
    Schedule(schedule::ScheduleArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Udp(args) => udp::handle(args).await,
        Commands::Http(args) => http::handle(args).await,
        Commands::Schedule(args) => schedule::handle(args),
    };

    if let Err(e) = &result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
