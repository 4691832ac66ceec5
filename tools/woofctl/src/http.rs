//! HTTP trigger client

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args};
use colored::*;
use tracing::debug;
use woofsrv::DEFAULT_PORT;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("action").required(true).args(["on", "off"])))]
pub struct HttpArgs {
    /// Trigger base URL, including the path prefix
    #[arg(long, default_value_t = format!("http://127.0.0.1:{}/", DEFAULT_PORT))]
    pub url: String,

    /// Request "on"
    #[arg(long)]
    pub on: bool,

    /// Request "off"
    #[arg(long)]
    pub off: bool,
}

impl HttpArgs {
    fn command(&self) -> &'static str {
        if self.on {
            "on"
        } else {
            "off"
        }
    }
}

/// `{base}{cmd}`, adding the separating `/` when the base lacks one
pub fn command_url(base: &str, cmd: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, cmd)
    } else {
        format!("{}/{}", base, cmd)
    }
}

pub async fn handle(args: HttpArgs) -> Result<()> {
    let body = send(&args.url, args.command()).await?;
    if body.starts_with("ERROR") {
        bail!("{}", body);
    }
    println!("{} {}", "✓".green(), body);
    Ok(())
}

async fn send(base: &str, cmd: &str) -> Result<String> {
    let url = command_url(base, cmd);
    debug!("GET {}", url);

    let client = reqwest::Client::builder().no_proxy().build()?;
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body = response.text().await.context("Failed to read response body")?;
    if !status.is_success() {
        bail!("{} returned {}", url, status);
    }
    Ok(body)
}
