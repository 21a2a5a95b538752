// logmonitor - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no UI
// dependencies. These types are the shared vocabulary across all layers:
// the parser produces LogRecords, the aggregators fold them into the
// per-frame results, and the scheduler bundles those into the
// FrameSnapshot the dashboard consumes.

use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Log record (normalised output of parsing)
// =============================================================================

/// One parsed Common Log Format line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Remote host, kept as an opaque string (IP or name).
    pub host: String,

    /// Authenticated user. Empty when the raw field is `-`.
    pub auth_user: String,

    /// The bracketed local timestamp, timezone preserved.
    pub local_time: DateTime<FixedOffset>,

    /// The quoted request and its trailing code/size fields.
    pub request: HttpRequest,
}

/// The HTTP portion of a log line: `"GET /route HTTP/1.1" 200 612`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method, uppercase (`GET`, `POST`, ...).
    pub method: String,

    /// Requested route as written in the log.
    pub route: String,

    /// Protocol version (`HTTP/1.1`).
    pub version: String,

    /// Status code, 0–999.
    pub code: u16,

    /// Served content size in bytes. `-` parses as 0.
    pub size: u64,
}

// =============================================================================
// Per-frame aggregation results
// =============================================================================

/// Request occurrences aggregated under one URL section for one frame.
///
/// A section is the path prefix up to (but not including) the second `/`:
/// `/a/b/c` belongs to `/a`, `/index.html` belongs to `/`. Rebuilt from
/// scratch every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// The section this hit counts requests for.
    pub section: String,

    /// Total requests observed for the section this frame.
    pub total: u64,

    /// Per-method breakdown of `total`.
    pub methods: HashMap<String, u64>,
}

impl Hit {
    pub fn new(section: &str) -> Self {
        Self {
            section: section.to_string(),
            total: 0,
            methods: HashMap::new(),
        }
    }

    /// Account for one request made with `method`.
    pub fn record(&mut self, method: &str) {
        self.total += 1;
        *self.methods.entry(method.to_string()).or_insert(0) += 1;
    }
}

/// All rate measures produced by the rates aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rates {
    pub global: GlobalRates,
    pub frame: FrameRates,
}

/// Measures scoped to the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRates {
    /// Frame duration in whole seconds.
    pub duration_s: u64,

    /// `n_requests / duration_s`, integer division.
    pub req_per_s: u64,

    /// Total requests observed this frame.
    pub n_requests: u64,

    /// Requests with a status code below 400.
    pub n_success: u64,

    /// `n_requests - n_success`.
    pub n_failures: u64,
}

/// Measures accumulated since process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalRates {
    /// Arithmetic mean of `frame.req_per_s` over all completed frames.
    pub avg_req_per_s: u64,

    /// Running maximum of `frame.req_per_s`. Non-decreasing.
    pub max_req_per_s: u64,

    /// Number of frames folded into the mean so far.
    pub n_measures: u64,
}

/// Status-code occurrence counts for one frame.
pub type CodeTally = HashMap<u16, u64>;

// =============================================================================
// Alert state
// =============================================================================

/// Public state of the sustained-rate alert.
///
/// `is_on` flips at most once per alert observation window; while the alert
/// is off, `avg` and `n_reqs` are zero by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertState {
    /// True while the alert is firing.
    pub is_on: bool,

    /// Average req/s the alert was triggered at. Zero while off.
    pub avg: u64,

    /// Number of requests that triggered the alert. Zero while off.
    pub n_reqs: u64,

    /// Instant of the last on/off transition. `None` until the alert has
    /// fired or recovered at least once — the "never fired" signal.
    pub date: Option<DateTime<Utc>>,

    /// Configured req/s threshold.
    pub threshold: u64,

    /// Configured observation window.
    pub duration: Duration,
}

impl AlertState {
    pub fn new(threshold: u64, duration: Duration) -> Self {
        Self {
            is_on: false,
            avg: 0,
            n_reqs: 0,
            date: None,
            threshold,
            duration,
        }
    }
}

// =============================================================================
// Frame snapshot (pushed to the dashboard once per frame)
// =============================================================================

/// The immutable bundle of every aggregator's result for one frame.
///
/// `hits` is strictly descending by `total`; ties keep the order in which
/// the sections first appeared within the frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub hits: Vec<Hit>,
    pub rates: Rates,
    pub codes: CodeTally,
    pub alert: AlertState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_record_counts_total_and_method() {
        let mut hit = Hit::new("/api");
        hit.record("GET");
        hit.record("GET");
        hit.record("POST");

        assert_eq!(hit.total, 3);
        assert_eq!(hit.methods.get("GET"), Some(&2));
        assert_eq!(hit.methods.get("POST"), Some(&1));
    }

    #[test]
    fn test_alert_state_starts_off_with_no_date() {
        let state = AlertState::new(10, Duration::from_secs(120));
        assert!(!state.is_on);
        assert_eq!(state.avg, 0);
        assert_eq!(state.n_reqs, 0);
        assert!(state.date.is_none());
        assert_eq!(state.threshold, 10);
    }
}
