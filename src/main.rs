// logmonitor - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation
// 3. Pipeline + dashboard launch

use clap::Parser;
use logmonitor::app;
use logmonitor::app::config::Config;
use logmonitor::util;
use logmonitor::util::constants::{
    DEFAULT_ALERT_THRESHOLD, DEFAULT_LOG_PATH,
};
use std::path::PathBuf;
use std::time::Duration;

/// Monitors a log file following the common log format.
///
/// Displays live metrics for the monitored file: request rate, successful
/// and failed calls, HTTP return codes, and the most-hit website sections.
/// An alert fires when the average request rate stays above the threshold
/// for a whole observation window, and recovers when it drops back below.
#[derive(Parser, Debug)]
#[command(name = "logmonitor", version, about)]
struct Cli {
    /// Path to the log file to monitor traffic from.
    #[arg(short = 'p', long = "path", default_value = DEFAULT_LOG_PATH)]
    path: PathBuf,

    /// Refresh rate - how often stats are computed and displayed.
    #[arg(short = 'u', long = "update", default_value = "10s",
          value_parser = humantime::parse_duration)]
    update: Duration,

    /// Alert observation window - the alert state is re-evaluated once
    /// per elapsed window.
    #[arg(short = 'T', long = "alert-period", default_value = "2m",
          value_parser = humantime::parse_duration)]
    alert_period: Duration,

    /// Request-per-second threshold; the alert fires when the windowed
    /// average stays at or above it.
    #[arg(short = 't', long = "alert-threshold",
          default_value_t = DEFAULT_ALERT_THRESHOLD)]
    alert_threshold: u64,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init();

    let config = Config {
        log_path: cli.path,
        frame_duration: cli.update,
        alert_period: cli.alert_period,
        alert_threshold: cli.alert_threshold,
    };

    if let Err(msg) = config.validate() {
        eprintln!("Error: {msg}");
        std::process::exit(2);
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        path = %config.log_path.display(),
        "logmonitor starting"
    );

    if let Err(e) = app::run(&config) {
        tracing::error!(error = %e, "logmonitor exited with error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
