//! Structured Logger
//!
//! Wraps `tracing` to provide console output (plain or JSON), optional file
//! rotation (NDJSON), and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of the rolling log files, suffixed with the date.
pub const LOG_FILE_PREFIX: &str = "upload-endpoint.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` overrides `level` when set. An unparsable level falls back to
/// `info`. When `log_dir` is given, a rolling JSON file logger is added next
/// to the console one. Calling this twice keeps the first subscriber.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_console = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_current_span(true)
    });
    let plain_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
    });

    // Rolling file appender: writes NDJSON to `<dir>/upload-endpoint.log.YYYY-MM-DD`
    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init();
}
