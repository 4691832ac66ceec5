//! Unified service bootstrap utilities
//!
//! Startup banner and logging initialization shared by woofie binaries.

use tracing::info;

use crate::logging::{self, LogConfig, LoggingError, LoggingGuard};

/// Service metadata for startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Service name (e.g., "woofsrv")
    pub name: String,
    /// Binary version, pass `env!("CARGO_PKG_VERSION")` from the binary crate
    pub version: String,
    pub description: String,
    pub default_port: u16,
}

impl ServiceInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        default_port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            default_port,
        }
    }
}

const BANNER: &str = r#"
 ██╗    ██╗ ██████╗  ██████╗ ███████╗██╗███████╗
 ██║    ██║██╔═══██╗██╔═══██╗██╔════╝██║██╔════╝
 ██║ █╗ ██║██║   ██║██║   ██║█████╗  ██║█████╗
 ██║███╗██║██║   ██║██║   ██║██╔══╝  ██║██╔══╝
 ╚███╔███╔╝╚██████╔╝╚██████╔╝██║     ██║███████╗
  ╚══╝╚══╝  ╚═════╝  ╚═════╝ ╚═╝     ╚═╝╚══════╝
"#;

/// Print the startup banner through the logger
pub fn print_startup_banner(service: &ServiceInfo) {
    info!("{}", BANNER);
    info!(" {} v{}", service.name.to_uppercase(), service.version);
    info!(" {}", service.description);
    info!(" Default Port: {}", service.default_port);
    info!("");
}

/// Initialize logging with the service name as tag
pub fn init_logging(
    service: &ServiceInfo,
    mut config: LogConfig,
) -> Result<LoggingGuard, LoggingError> {
    config.service_name = service.name.clone();
    logging::init_with_config(&config)
}
