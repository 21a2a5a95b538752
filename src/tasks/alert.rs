// logmonitor - tasks/alert.rs
//
// Sustained-rate alert: a state machine spanning many frames.
//
// Each frame folds the measured request rate into a running mean over the
// current observation window. The on/off transition is evaluated at window
// boundaries only, so a one-frame spike cannot fire the alert:
//
//   - off → on  when the window's mean rate reaches the threshold;
//   - on  → off when the window's mean rate falls below it.
//
// With a 2-minute window and a threshold of 10 req/s, the alert fires once
// the average over those 2 minutes is at least 10 req/s, and recovers once
// a later window averages below it.
//
// Time is read exclusively through the Clock seam so tests can script the
// window rolls instead of sleeping.

use crate::core::clock::Clock;
use crate::core::model::{AlertState, Rates};
use crate::tasks::FrameTask;
use crate::util::error::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub struct Alert {
    /// Mean req/s above which the alert fires, below which it recovers.
    threshold: u64,
    /// The observation window, precomputed for elapsed-time comparisons.
    window: chrono::Duration,
    /// Opening instant of the current window. Set on the first `run`.
    window_start: Option<DateTime<Utc>>,
    /// Running mean req/s over the measures taken this window.
    avg_req: u64,
    /// Number of measures folded into `avg_req`.
    n_measures: u64,
    /// Requests accumulated over this window. Float so fractional frame
    /// contributions sum exactly.
    n_reqs: f64,
    state: AlertState,
}

impl Alert {
    /// `duration` is the observation window; `threshold` the mean req/s
    /// that fires the alert.
    pub fn new(duration: Duration, threshold: u64) -> Self {
        Self {
            threshold,
            window: chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX),
            window_start: None,
            avg_req: 0,
            n_measures: 0,
            n_reqs: 0.0,
            state: AlertState::new(threshold, duration),
        }
    }

    /// Fold one frame's rates into the current window and, at a window
    /// boundary, evaluate the transition rule and roll the window.
    ///
    /// Called once per frame by the scheduler, as soon as the rates task
    /// has completed.
    pub fn run(&mut self, rates: Rates, clock: &dyn Clock) {
        let now = clock.now();
        let start = *self.window_start.get_or_insert(now);

        self.avg_req =
            (self.avg_req * self.n_measures + rates.frame.req_per_s) / (self.n_measures + 1);
        self.n_measures += 1;

        // Requests observed during this frame.
        let frame_reqs = rates.frame.req_per_s as f64 * rates.frame.duration_s as f64;
        self.n_reqs += frame_reqs;

        // A backwards clock jump yields a negative elapsed time; the window
        // simply does not roll until the clock passes the boundary again.
        if now.signed_duration_since(start) >= self.window {
            if !self.state.is_on && self.avg_req >= self.threshold {
                self.state.is_on = true;
                self.state.date = Some(now);
                // The current frame's requests belong to the next window.
                self.state.n_reqs = (self.n_reqs - frame_reqs) as u64;
                self.state.avg = self.avg_req;
            }

            if self.state.is_on && self.avg_req < self.threshold {
                self.state.is_on = false;
                self.state.date = Some(now);
                self.state.n_reqs = 0;
                self.state.avg = 0;
            }

            // Open the next observation window.
            self.window_start = Some(now);
            self.avg_req = 0;
            self.n_measures = 0;
            self.n_reqs = 0.0;
        }
    }

    /// A copy of the current public alert state.
    pub fn result(&self) -> AlertState {
        self.state
    }
}

impl FrameTask for Alert {
    fn before_run(&mut self) {}

    fn after_run(&mut self) -> Result<()> {
        Ok(())
    }

    /// Always false: alerting is a never-ending monitoring task. The
    /// scheduler gates it on the rates task instead.
    fn is_done(&self) -> bool {
        false
    }

    fn close(&mut self) {
        let duration = self.state.duration;
        *self = Alert::new(duration, self.threshold);
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::model::FrameRates;
    use chrono::TimeZone;

    fn rates(req_per_s: u64, duration_s: u64) -> Rates {
        Rates {
            frame: FrameRates {
                duration_s,
                req_per_s,
                n_requests: req_per_s * duration_s,
                n_success: req_per_s * duration_s,
                n_failures: 0,
            },
            global: Default::default(),
        }
    }

    fn start_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 2, 9, 16, 27, 0).unwrap()
    }

    /// Two frames at 5 req/s with a 1 s window and a threshold of 4:
    /// off after the first call, firing after the window rolls.
    #[test]
    fn test_alert_fires_after_one_window_above_threshold() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(1), 4);
        alert.before_run();

        alert.run(rates(5, 1), &clock);
        assert!(!alert.result().is_on);

        clock.advance(Duration::from_secs(1));
        alert.run(rates(5, 1), &clock);

        let state = alert.result();
        assert!(state.is_on);
        assert_eq!(state.avg, 5);
        assert_eq!(state.n_reqs, 5);
        assert_eq!(state.date, Some(clock.now()));
    }

    /// Continuing from a fired alert, one window below threshold recovers
    /// it and zeroes the public counters.
    #[test]
    fn test_alert_recovers_after_one_window_below_threshold() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(1), 4);
        alert.before_run();

        alert.run(rates(5, 1), &clock);
        clock.advance(Duration::from_secs(1));
        alert.run(rates(5, 1), &clock);
        assert!(alert.result().is_on);

        clock.advance(Duration::from_secs(1));
        alert.run(rates(2, 1), &clock);

        let state = alert.result();
        assert!(!state.is_on);
        assert_eq!(state.avg, 0);
        assert_eq!(state.n_reqs, 0);
        assert_eq!(state.date, Some(clock.now()));
    }

    /// 15 req/s over a 2-minute window fed as 1-minute frames: no
    /// transition mid-window; the boundary call fires with the request
    /// count of the two completed frames (15 * 120 = 1800).
    #[test]
    fn test_two_frame_window_fires_with_window_request_count() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(120), 10);
        alert.before_run();

        alert.run(rates(15, 60), &clock);
        assert!(!alert.result().is_on);

        clock.advance(Duration::from_secs(60));
        alert.run(rates(15, 60), &clock);
        assert!(!alert.result().is_on);

        clock.advance(Duration::from_secs(60));
        alert.run(rates(15, 60), &clock);

        let state = alert.result();
        assert!(state.is_on);
        assert_eq!(state.avg, 15);
        assert_eq!(state.n_reqs, 1800);
    }

    /// A whole window below threshold rolls the window without firing:
    /// the alert stays off and `date` still reports "never fired".
    #[test]
    fn test_quiet_window_rolls_without_firing() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(60), 4);
        alert.before_run();

        alert.run(rates(2, 60), &clock);
        clock.advance(Duration::from_secs(60));
        alert.run(rates(2, 60), &clock);

        let state = alert.result();
        assert!(!state.is_on);
        assert_eq!(state.avg, 0);
        assert_eq!(state.n_reqs, 0);
        assert_eq!(state.date, None, "alert must report never-fired");
    }

    /// While off, the public counters are zero by construction.
    #[test]
    fn test_off_state_always_has_zero_counters() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(1), 100);
        alert.before_run();

        for _ in 0..5 {
            alert.run(rates(7, 1), &clock);
            let state = alert.result();
            assert!(!state.is_on);
            assert_eq!(state.avg, 0);
            assert_eq!(state.n_reqs, 0);
            clock.advance(Duration::from_secs(1));
        }
    }

    /// A backwards clock jump must not panic or roll the window; once the
    /// clock moves past the boundary again the window resumes rolling.
    #[test]
    fn test_backwards_clock_jump_is_tolerated() {
        let clock = ManualClock::new(start_instant());
        let mut alert = Alert::new(Duration::from_secs(1), 4);
        alert.before_run();

        alert.run(rates(5, 1), &clock);
        clock.set(start_instant() - chrono::Duration::seconds(30));
        alert.run(rates(5, 1), &clock);
        assert!(!alert.result().is_on);

        clock.set(start_instant() + chrono::Duration::seconds(2));
        alert.run(rates(5, 1), &clock);
        assert!(alert.result().is_on);
    }

    /// `is_done` never completes: the scheduler owns the notion of frame
    /// completion for the alert.
    #[test]
    fn test_is_done_is_always_false() {
        let mut alert = Alert::new(Duration::from_secs(1), 4);
        assert!(!alert.is_done());
        alert.before_run();
        let clock = ManualClock::new(start_instant());
        alert.run(rates(1, 1), &clock);
        assert!(!alert.is_done());
    }
}
