//! File-based logging for Chefify
//!
//! The TUI owns the terminal, so tracing output goes to a daily rotating log
//! file instead of stdout.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::KeyValueStore;

const LOG_FILE_PREFIX: &str = "chefify";
const FALLBACK_LOG_DIR: &str = ".logs";
const DEFAULT_FILTER: &str = "chefify=debug,warn";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log file: {0}")]
    Appender(#[from] InitError),

    #[error("Logging already initialized: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Directory for log files: `logs/` inside the cache directory, or `.logs`
pub fn default_log_dir() -> PathBuf {
    KeyValueStore::default_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG_DIR))
}

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/chefify.YYYY-MM-DD.log`. The level can be
/// controlled via `RUST_LOG`; the default is debug for this crate and warn for
/// everything else.
///
/// The returned guard flushes pending log lines when dropped, so keep it alive
/// for the lifetime of the application.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}", log_dir.display());

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir_ends_in_logs() {
        let dir = default_log_dir();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name == "logs" || name == ".logs");
    }
}
