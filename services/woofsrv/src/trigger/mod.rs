//! Network triggers
//!
//! Each trigger turns inbound requests into [`BarkService::woof_on`] and
//! [`BarkService::woof_off`] calls until the shutdown token fires.

use std::sync::Arc;

use async_trait::async_trait;
use errors::WoofResult;
use tokio_util::sync::CancellationToken;

use crate::service::BarkService;

pub mod http;
pub mod udp;

pub use http::HttpTrigger;
pub use udp::{command_digest, UdpCommand, UdpTrigger};

#[async_trait]
pub trait WoofTrigger: Send + Sized {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn run(self, service: Arc<BarkService>, shutdown: CancellationToken) -> WoofResult<()>;
}
