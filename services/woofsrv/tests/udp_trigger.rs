//! UDP trigger over loopback
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, TimeZone};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use tracing_test::traced_test;
use woof_engine::{BarkConfig, BarkController};
use woof_schedule::Schedule;
use woofsrv::{trigger::command_digest, trigger::UdpCommand, BarkService, ManualClock, UdpTrigger};

fn service() -> Arc<BarkService> {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2017, 1, 28, 9, 0, 0)
        .unwrap();
    Arc::new(BarkService::new(
        Arc::new(BarkController::with_seed(BarkConfig::default(), 11)),
        Arc::new(Schedule::parse("1-5=11-19,6=12-17").unwrap()),
        Arc::new(ManualClock::new(now)),
    ))
}

async fn wait_for(service: &BarkService, barking: bool) {
    for _ in 0..100 {
        if service.status().barking == barking {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("service never reached barking={barking}");
}

#[tokio::test]
#[traced_test]
async fn test_digest_packets_drive_service() {
    let service = service();
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let trigger = UdpTrigger::new("bow wow", addr.port());
    let server = {
        let service = Arc::clone(&service);
        let shutdown = shutdown.clone();
        tokio::spawn(
            async move { trigger.serve(socket, service, shutdown).await }.in_current_span(),
        )
    };

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    // Garbage first; the listener must survive it
    client.send_to(b"woof", addr).await.unwrap();
    client
        .send_to(&command_digest("wrong", UdpCommand::On), addr)
        .await
        .unwrap();

    client
        .send_to(&command_digest("bow wow", UdpCommand::On), addr)
        .await
        .unwrap();
    wait_for(&service, true).await;
    assert!(logs_contain("Invalid packet size 4"));
    assert!(logs_contain("Unrecognized packet digest"));
    assert!(logs_contain("Started fresh bark cycle"));

    client
        .send_to(&command_digest("bow wow", UdpCommand::Off), addr)
        .await
        .unwrap();
    wait_for(&service, false).await;

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
