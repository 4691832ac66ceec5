//! UDP trigger
//!
//! Each datagram is a bare 16-byte MD5 digest of `"{psk}:on"` or
//! `"{psk}:off"`. Anything else is logged and dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use errors::{protocol_error, WoofError, WoofResult};
use md5::{Digest, Md5};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::WoofTrigger;
use crate::service::BarkService;

/// Size of a command datagram
pub const PACKET_LEN: usize = 16;

/// Receive buffer, large enough to see oversized packets whole
pub const RECV_BUFFER: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdpCommand {
    On,
    Off,
}

impl UdpCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// MD5 of `"{psk}:{cmd}"`
pub fn command_digest(psk: &str, cmd: UdpCommand) -> [u8; PACKET_LEN] {
    let digest = Md5::digest(format!("{}:{}", psk, cmd.as_str()).as_bytes());
    let mut out = [0u8; PACKET_LEN];
    out.copy_from_slice(&digest);
    out
}

#[derive(Debug, Clone)]
pub struct UdpTrigger {
    port: u16,
    on: [u8; PACKET_LEN],
    off: [u8; PACKET_LEN],
}

impl UdpTrigger {
    pub fn new(psk: &str, port: u16) -> Self {
        Self {
            port,
            on: command_digest(psk, UdpCommand::On),
            off: command_digest(psk, UdpCommand::Off),
        }
    }

    pub fn decode(&self, packet: &[u8]) -> WoofResult<UdpCommand> {
        if packet.len() != PACKET_LEN {
            return Err(protocol_error!("Invalid packet size {}", packet.len()));
        }
        if packet == self.on {
            Ok(UdpCommand::On)
        } else if packet == self.off {
            Ok(UdpCommand::Off)
        } else {
            Err(protocol_error!("Unrecognized packet digest"))
        }
    }

    /// Listen on an already bound socket
    pub async fn serve(
        &self,
        socket: UdpSocket,
        service: Arc<BarkService>,
        shutdown: CancellationToken,
    ) -> WoofResult<()> {
        let mut buf = vec![0u8; RECV_BUFFER];
        loop {
            let (len, peer) = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = socket.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(e) => {
                        WoofError::from(e).log("Error reading packet");
                        continue;
                    },
                },
            };

            debug!("Packet from {} ({} len)", peer, len);
            match self.decode(&buf[..len]) {
                Ok(UdpCommand::On) => {
                    info!("Received on request");
                    service.woof_on();
                },
                Ok(UdpCommand::Off) => {
                    info!("Received off request");
                    service.woof_off();
                },
                Err(e) => e.log(&format!("Error processing packet from {}", peer)),
            }
        }

        info!("UDP trigger stopped");
        Ok(())
    }
}

#[async_trait]
impl WoofTrigger for UdpTrigger {
    fn name(&self) -> &'static str {
        "udp"
    }

    async fn run(self, service: Arc<BarkService>, shutdown: CancellationToken) -> WoofResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| WoofError::transport("udp", format!("Failed to bind {}: {}", addr, e)))?;

        info!("UDP trigger listening on {}", addr);
        self.serve(socket, service, shutdown).await
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use errors::ErrorCategory;

    #[test]
    fn test_command_digest_known_value() {
        // md5("bow wow:on")
        let expected = Md5::digest(b"bow wow:on");
        assert_eq!(command_digest("bow wow", UdpCommand::On)[..], expected[..]);
        assert_ne!(
            command_digest("bow wow", UdpCommand::On),
            command_digest("bow wow", UdpCommand::Off)
        );
    }

    #[test]
    fn test_decode() {
        let trigger = UdpTrigger::new("bow wow", 0);

        let on = command_digest("bow wow", UdpCommand::On);
        let off = command_digest("bow wow", UdpCommand::Off);
        assert_eq!(trigger.decode(&on).unwrap(), UdpCommand::On);
        assert_eq!(trigger.decode(&off).unwrap(), UdpCommand::Off);

        let wrong_key = command_digest("meow", UdpCommand::On);
        let err = trigger.decode(&wrong_key).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Protocol);

        let err = trigger.decode(&on[..15]).unwrap_err();
        assert_eq!(err.to_string(), "Protocol error: Invalid packet size 15");

        let mut long = on.to_vec();
        long.push(0);
        assert!(trigger.decode(&long).is_err());
    }
}
