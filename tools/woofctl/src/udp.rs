//! UDP trigger client

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::*;
use tokio::net::UdpSocket;
use tracing::debug;
use woofsrv::{trigger::command_digest, trigger::UdpCommand, DEFAULT_PORT};

/// Pause between `on` and `off` when both are sent
pub const ON_OFF_GAP: Duration = Duration::from_secs(2);

#[derive(Args, Debug)]
pub struct UdpArgs {
    /// Target address
    #[arg(long, default_value = "127.0.0.1")]
    pub ip: String,

    /// Target port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Preshared password
    #[arg(long, default_value = "bow wow")]
    pub pass: String,

    /// Send "on"
    #[arg(long)]
    pub on: bool,

    /// Send "off" (after "on" if both are given)
    #[arg(long)]
    pub off: bool,

    /// Keep going when a send fails
    #[arg(long)]
    pub ignore: bool,
}

impl UdpArgs {
    fn commands(&self) -> Result<Vec<UdpCommand>> {
        let mut commands = Vec::new();
        if self.on {
            commands.push(UdpCommand::On);
        }
        if self.off {
            commands.push(UdpCommand::Off);
        }
        if commands.is_empty() {
            bail!("Nothing to send: give --on, --off or both");
        }
        Ok(commands)
    }
}

pub async fn handle(args: UdpArgs) -> Result<()> {
    let commands = args.commands()?;
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("Failed to open UDP socket")?;
    let target = format!("{}:{}", args.ip, args.port);

    send_commands(&socket, &target, &args.pass, &commands, ON_OFF_GAP, args.ignore).await
}

async fn send_commands(
    socket: &UdpSocket,
    target: &str,
    pass: &str,
    commands: &[UdpCommand],
    gap: Duration,
    ignore: bool,
) -> Result<()> {
    for (i, cmd) in commands.iter().enumerate() {
        if i > 0 {
            debug!("Waiting {:?} before {}", gap, cmd.as_str());
            tokio::time::sleep(gap).await;
        }

        let packet = command_digest(pass, *cmd);
        match socket.send_to(&packet, target).await {
            Ok(_) => println!("{} {} -> {}", "✓".green(), cmd.as_str(), target),
            Err(e) if ignore => {
                eprintln!("{} {} -> {}: {}", "⚠".yellow(), cmd.as_str(), target, e)
            },
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to send {} to {}", cmd.as_str(), target));
            },
        }
    }
    Ok(())
}
