//! woofsrv service entry point

use std::sync::Arc;

use clap::Parser;
use common::{
    service_bootstrap::{init_logging, print_startup_banner},
    shutdown::cancel_on_shutdown,
    LogConfig, LogDestination, ServiceInfo,
};
use errors::WoofResult;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use woof_engine::BarkController;
use woof_sounds::{RodioPlayer, SampleLibrary};
use woofsrv::{
    Args, BarkService, HttpTrigger, PlaybackLoop, SystemClock, TriggerMode, UdpTrigger,
    WoofConfig, WoofTrigger, DEFAULT_PORT,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match WoofConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("woofsrv: {}", e);
            std::process::exit(2);
        },
    };

    let service_info = ServiceInfo::new(
        "woofsrv",
        env!("CARGO_PKG_VERSION"),
        "Network-triggered door-bark simulator",
        DEFAULT_PORT,
    );
    let log_config = LogConfig {
        destination: config.log.parse().unwrap_or(LogDestination::Stderr),
        level: config.log_level.clone(),
        ..LogConfig::default()
    };
    let _log_guard = match init_logging(&service_info, log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("woofsrv: {}", e);
            std::process::exit(2);
        },
    };

    if let Err(e) = run(args, config, &service_info).await {
        e.log("woofsrv failed");
        std::process::exit(1);
    }
}

async fn run(args: Args, config: WoofConfig, service_info: &ServiceInfo) -> WoofResult<()> {
    print_startup_banner(service_info);

    let library = SampleLibrary::scan(&config.woofdir)?;
    info!(
        "Found {} sounds in {}",
        library.len(),
        config.woofdir.display()
    );
    for sample in library.samples() {
        info!("  {}", sample);
    }

    let schedule = config.quiet_schedule()?;
    if schedule.is_empty() {
        info!("No quiet hours");
    } else {
        info!("Quiet hours:\n{}", schedule.dump());
    }

    if args.validate {
        info!("Configuration OK");
        return Ok(());
    }

    let controller = Arc::new(BarkController::new(config.bark_config()));
    info!("Controller: {:?}", controller.config());
    let service = Arc::new(BarkService::new(
        controller,
        Arc::new(schedule),
        Arc::new(SystemClock),
    ));

    let shutdown = CancellationToken::new();
    let signal_watcher = cancel_on_shutdown(shutdown.clone());

    let playback = PlaybackLoop::new(
        Arc::clone(&service),
        Arc::new(library),
        Arc::new(RodioPlayer::new()),
    );
    let playback_handle = tokio::spawn(playback.run(shutdown.clone()));

    let result = match config.mode {
        TriggerMode::Http => {
            start_trigger(HttpTrigger::new(&config.path, config.port), service, shutdown.clone())
                .await
        },
        TriggerMode::Udp => {
            start_trigger(UdpTrigger::new(&config.pass, config.port), service, shutdown.clone())
                .await
        },
    };

    shutdown.cancel();
    if let Err(e) = playback_handle.await {
        error!("Playback loop panicked: {}", e);
    }
    signal_watcher.abort();

    info!("woofsrv stopped");
    result
}

async fn start_trigger<T: WoofTrigger>(
    trigger: T,
    service: Arc<BarkService>,
    shutdown: CancellationToken,
) -> WoofResult<()> {
    info!("Starting {} trigger", trigger.name());
    trigger.run(service, shutdown).await
}
