// logmonitor - util/logging.rs
//
// Structured logging for a process whose stdout belongs to the dashboard.
//
// Output goes to a best-effort log file (ERROR_LOG_PATH); if that file
// cannot be opened the subscriber falls back to stderr. Failure to open
// the file is never fatal.
//
// Level priority: RUST_LOG env var > default "info".

use crate::util::constants::{DEFAULT_LOG_LEVEL, ERROR_LOG_PATH};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem. Call once, before the terminal is
/// put into raw mode.
pub fn init() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ERROR_LOG_PATH);

    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .compact()
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact()
                .init();
            tracing::info!(
                path = ERROR_LOG_PATH,
                error = %e,
                "Cannot open error-log file, logging to stderr"
            );
        }
    }

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}
