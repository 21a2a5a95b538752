// logmonitor - ui/format.rs
//
// Plain-string formatting for the dashboard panels. Kept free of any
// terminal types so the message wording is unit-testable on its own.

use crate::core::model::{AlertState, CodeTally, Hit, Rates};
use chrono::{DateTime, Utc};

/// Timestamp rendering used in alert messages.
const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn instant(date: &DateTime<Utc>) -> String {
    date.format(INSTANT_FORMAT).to_string()
}

/// The alert's configured parameters, shown regardless of its state.
pub fn alert_settings(threshold: u64, duration: std::time::Duration) -> String {
    format!(
        "Threshold: {threshold} req/s Duration: {}",
        humantime::format_duration(duration)
    )
}

/// Message emitted when the alert switches on.
pub fn alert_firing(state: &AlertState) -> String {
    let date = state.date.map(|d| instant(&d)).unwrap_or_default();
    format!(
        "High traffic generated an alert - hits = {}, triggered at {date}",
        state.n_reqs
    )
}

/// Message emitted when the alert switches back off.
pub fn alert_recovered(state: &AlertState) -> String {
    let date = state.date.map(|d| instant(&d)).unwrap_or_default();
    format!("Traffic is back to normal - recovery time is {date}")
}

/// The one-line frame/global rates summary.
pub fn rates_line(rates: &Rates) -> String {
    format!(
        "Frame: {}s Max: {} req/s Avg: {} req/s Success: {} Failure: {}",
        rates.frame.duration_s,
        rates.global.max_req_per_s,
        rates.global.avg_req_per_s,
        rates.frame.n_success,
        rates.frame.n_failures,
    )
}

/// One section entry for the "Most hits" panel: `/a: 3 (GET: 2, POST: 1)`.
/// Methods are listed alphabetically so the output is stable.
pub fn hit_line(hit: &Hit) -> String {
    let mut methods: Vec<(&String, &u64)> = hit.methods.iter().collect();
    methods.sort_by_key(|(method, _)| method.as_str());

    let breakdown = methods
        .iter()
        .map(|(method, count)| format!("{method}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{}: {} ({breakdown})", hit.section, hit.total)
}

/// Group a code tally into 1xx..5xx class bins.
pub fn code_bins(codes: &CodeTally) -> [u64; 5] {
    let mut bins = [0u64; 5];
    for (code, count) in codes {
        if (100..600).contains(code) {
            bins[(code / 100 - 1) as usize] += count;
        }
    }
    bins
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FrameRates, GlobalRates};
    use chrono::TimeZone;
    use std::time::Duration;

    fn fired_state() -> AlertState {
        AlertState {
            is_on: true,
            avg: 12,
            n_reqs: 1800,
            date: Some(Utc.with_ymd_and_hms(2020, 2, 9, 16, 27, 0).unwrap()),
            threshold: 10,
            duration: Duration::from_secs(120),
        }
    }

    #[test]
    fn test_alert_firing_message() {
        assert_eq!(
            alert_firing(&fired_state()),
            "High traffic generated an alert - hits = 1800, \
             triggered at 2020-02-09 16:27:00 UTC"
        );
    }

    #[test]
    fn test_alert_recovered_message() {
        let mut state = fired_state();
        state.is_on = false;
        assert_eq!(
            alert_recovered(&state),
            "Traffic is back to normal - recovery time is 2020-02-09 16:27:00 UTC"
        );
    }

    #[test]
    fn test_alert_settings_line() {
        assert_eq!(
            alert_settings(10, Duration::from_secs(120)),
            "Threshold: 10 req/s Duration: 2m"
        );
    }

    #[test]
    fn test_rates_line() {
        let rates = Rates {
            frame: FrameRates {
                duration_s: 10,
                req_per_s: 4,
                n_requests: 40,
                n_success: 37,
                n_failures: 3,
            },
            global: GlobalRates {
                avg_req_per_s: 3,
                max_req_per_s: 9,
                n_measures: 7,
            },
        };
        assert_eq!(
            rates_line(&rates),
            "Frame: 10s Max: 9 req/s Avg: 3 req/s Success: 37 Failure: 3"
        );
    }

    #[test]
    fn test_hit_line_sorts_methods() {
        let mut hit = Hit::new("/api");
        hit.record("POST");
        hit.record("GET");
        hit.record("GET");
        assert_eq!(hit_line(&hit), "/api: 3 (GET: 2, POST: 1)");
    }

    #[test]
    fn test_code_bins_group_by_class() {
        let mut codes = CodeTally::new();
        for code in [200, 201, 404, 500, 500, 302] {
            *codes.entry(code).or_insert(0) += 1;
        }
        assert_eq!(code_bins(&codes), [0, 3, 1, 1, 2]);
    }

    #[test]
    fn test_code_bins_ignore_out_of_class_codes() {
        let mut codes = CodeTally::new();
        codes.insert(99, 4);
        codes.insert(600, 2);
        codes.insert(0, 1);
        assert_eq!(code_bins(&codes), [0, 0, 0, 0, 0]);
    }
}
