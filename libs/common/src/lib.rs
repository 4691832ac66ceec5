//! Shared service plumbing for woofie binaries
//!
//! - logging destinations and format
//! - startup banner
//! - shutdown signal handling

pub mod logging;
pub mod service_bootstrap;
pub mod shutdown;

pub use logging::{LogConfig, LogDestination, LoggingError, LoggingGuard};
pub use service_bootstrap::ServiceInfo;
