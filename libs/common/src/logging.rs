//! Unified logging module for woofie services
//!
//! One destination per process, picked from the `--log` value:
//! - `stderr`: colored console output
//! - `syslog`: RFC 3164 datagrams to the local syslog socket
//! - anything else: a file path, appended to through a non-blocking writer

use std::fmt as stdfmt;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{Level, Metadata};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Default local syslog socket
pub const SYSLOG_SOCKET: &str = "/dev/log";

/// Syslog facility `daemon`
const SYSLOG_FACILITY_DAEMON: u8 = 3;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Couldn't open logfile {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Couldn't open syslog: {0}")]
    Syslog(#[source] io::Error),

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Custom event formatter that outputs: `timestamp [LEVEL] message`
///
/// Example output: `2017-01-23T20:00:00.000000Z [INFO] Started fresh bark cycle`
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> stdfmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// ============================================================================
// Destination
// ============================================================================

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    Syslog,
    File(PathBuf),
}

impl FromStr for LogDestination {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "stderr" => Self::Stderr,
            "syslog" => Self::Syslog,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

impl stdfmt::Display for LogDestination {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Syslog => f.write_str("syslog"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// Syslog writer
// ============================================================================

/// Syslog severity for a tracing level
pub fn syslog_severity(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        Level::DEBUG | Level::TRACE => 7,
    }
}

/// RFC 3164 `<PRI>` value for the daemon facility
pub fn syslog_priority(level: &Level) -> u8 {
    SYSLOG_FACILITY_DAEMON * 8 + syslog_severity(level)
}

/// Sends each formatted event as one syslog datagram
#[cfg(unix)]
#[derive(Clone)]
pub struct SyslogWriter {
    socket: std::sync::Arc<std::os::unix::net::UnixDatagram>,
    tag: String,
}

#[cfg(unix)]
impl SyslogWriter {
    /// Connect to the local syslog socket
    pub fn connect(tag: impl Into<String>) -> Result<Self, LoggingError> {
        let socket = std::os::unix::net::UnixDatagram::unbound().map_err(LoggingError::Syslog)?;
        socket
            .connect(SYSLOG_SOCKET)
            .map_err(LoggingError::Syslog)?;
        Ok(Self::from_socket(socket, tag))
    }

    pub fn from_socket(socket: std::os::unix::net::UnixDatagram, tag: impl Into<String>) -> Self {
        Self {
            socket: std::sync::Arc::new(socket),
            tag: tag.into(),
        }
    }
}

/// Per-event handle carrying the event's level
#[cfg(unix)]
pub struct SyslogEvent {
    writer: SyslogWriter,
    level: Level,
}

#[cfg(unix)]
impl io::Write for SyslogEvent {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        let line = format!(
            "<{}>{} {}[{}]: {}",
            syslog_priority(&self.level),
            chrono::Local::now().format("%b %e %H:%M:%S"),
            self.writer.tag,
            std::process::id(),
            message.trim_end()
        );
        self.writer.socket.send(line.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
impl<'a> MakeWriter<'a> for SyslogWriter {
    type Writer = SyslogEvent;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogEvent {
            writer: self.clone(),
            level: Level::INFO,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogEvent {
            writer: self.clone(),
            level: *meta.level(),
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name, used as the syslog tag
    pub service_name: String,
    pub destination: LogDestination,
    /// Default filter directive when `RUST_LOG` is unset (e.g. `info`)
    pub level: String,
    /// Structured JSON lines for file output
    pub enable_json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "woofie".to_string(),
            destination: LogDestination::Stderr,
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

/// Keeps the non-blocking file writer flushing
///
/// Hold it for the process lifetime; dropping it flushes and stops the
/// background writer.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => {
            EnvFilter::try_new(directives).map_err(|e| LoggingError::Filter(e.to_string()))
        },
        _ => EnvFilter::try_new(level).map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

/// Initialize the global subscriber for the configured destination
pub fn init_with_config(config: &LogConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = build_filter(&config.level)?;
    let mut worker = None;

    let layer = match &config.destination {
        LogDestination::Stderr => fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .event_format(BracketedLevelFormat)
            .boxed(),
        #[cfg(unix)]
        LogDestination::Syslog => fmt::layer()
            .with_writer(SyslogWriter::connect(config.service_name.clone())?)
            .with_ansi(false)
            .without_time()
            .with_level(false)
            .with_target(false)
            .boxed(),
        #[cfg(not(unix))]
        LogDestination::Syslog => {
            return Err(LoggingError::Syslog(io::Error::new(
                io::ErrorKind::Unsupported,
                "syslog is only available on unix",
            )))
        },
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            worker = Some(guard);

            if config.enable_json {
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .boxed()
            } else {
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .event_format(BracketedLevelFormat)
                    .boxed()
            }
        },
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!("Logging: {} -> {}", config.service_name, config.destination);
    Ok(LoggingGuard { _worker: worker })
}
