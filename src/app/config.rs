// logmonitor - app/config.rs
//
// Runtime configuration, hydrated from CLI flags. Defaults live in
// util::constants so flags, docs, and tests agree on one set of values.

use crate::util::constants::{
    DEFAULT_ALERT_PERIOD_SECS, DEFAULT_ALERT_THRESHOLD, DEFAULT_FRAME_DURATION_SECS,
    DEFAULT_LOG_PATH, MIN_FRAME_DURATION_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// The log file to tail.
    pub log_path: PathBuf,

    /// Frame duration: the window over which per-frame measures are taken,
    /// and the dashboard's refresh rate.
    pub frame_duration: Duration,

    /// The alert's observation window. The alert state is recomputed once
    /// per elapsed window.
    pub alert_period: Duration,

    /// Mean req/s at or above which the alert fires.
    pub alert_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            frame_duration: Duration::from_secs(DEFAULT_FRAME_DURATION_SECS),
            alert_period: Duration::from_secs(DEFAULT_ALERT_PERIOD_SECS),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl Config {
    /// Reject configurations the pipeline cannot run with. Frame rates are
    /// integer requests per whole second, so sub-second frames are refused
    /// rather than silently measured as zero-length.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.frame_duration < Duration::from_secs(MIN_FRAME_DURATION_SECS) {
            return Err(format!(
                "--update must be at least {MIN_FRAME_DURATION_SECS}s, got {}",
                humantime::format_duration(self.frame_duration)
            ));
        }
        if self.alert_period < self.frame_duration {
            return Err(format!(
                "--alert-period ({}) must not be shorter than --update ({})",
                humantime::format_duration(self.alert_period),
                humantime::format_duration(self.frame_duration)
            ));
        }
        Ok(())
    }

    /// The frame duration in whole seconds, as fed to the rates task.
    pub fn frame_secs(&self) -> u64 {
        self.frame_duration.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_path, PathBuf::from("/tmp/access.log"));
        assert_eq!(config.frame_duration, Duration::from_secs(10));
        assert_eq!(config.alert_period, Duration::from_secs(120));
        assert_eq!(config.alert_threshold, 10);
    }

    #[test]
    fn test_sub_second_frame_is_rejected() {
        let config = Config {
            frame_duration: Duration::from_millis(500),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alert_period_shorter_than_frame_is_rejected() {
        let config = Config {
            frame_duration: Duration::from_secs(10),
            alert_period: Duration::from_secs(5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alert_period_equal_to_frame_is_accepted() {
        let config = Config {
            frame_duration: Duration::from_secs(1),
            alert_period: Duration::from_secs(1),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    /// The duration grammar the CLI accepts: suffixed integers.
    #[test]
    fn test_duration_flag_grammar() {
        assert_eq!(
            humantime::parse_duration("500ms").unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(
            humantime::parse_duration("10s").unwrap(),
            Duration::from_secs(10)
        );
        assert_eq!(
            humantime::parse_duration("2m").unwrap(),
            Duration::from_secs(120)
        );
        assert_eq!(
            humantime::parse_duration("1h").unwrap(),
            Duration::from_secs(3600)
        );
        assert!(humantime::parse_duration("ten seconds").is_err());
    }
}
