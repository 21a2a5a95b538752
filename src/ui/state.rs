// logmonitor - ui/state.rs
//
// View-side state: the latest snapshot, the req/s history feeding the bar
// chart, and the alert transition log. The dashboard applies each incoming
// snapshot here; the panels only read.

use crate::app::config::Config;
use crate::core::model::FrameSnapshot;
use crate::ui::format;
use crate::util::constants::{ALERT_LOG_CAPACITY, RATE_HISTORY_LEN};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

pub struct DashboardState {
    /// Alert parameters, shown in the banner before any snapshot arrives.
    pub alert_threshold: u64,
    pub alert_period: Duration,

    /// The most recent frame snapshot, if any has arrived yet.
    pub snapshot: Option<FrameSnapshot>,

    /// `req_per_s` of the last frames, oldest first. Bounded.
    pub history: VecDeque<u64>,

    /// Alert transition messages, newest first. Bounded.
    pub messages: VecDeque<String>,

    /// Transition instant of the last applied snapshot, for edge detection.
    last_transition: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(config: &Config) -> Self {
        Self {
            alert_threshold: config.alert_threshold,
            alert_period: config.alert_period,
            snapshot: None,
            history: VecDeque::with_capacity(RATE_HISTORY_LEN),
            messages: VecDeque::with_capacity(ALERT_LOG_CAPACITY),
            last_transition: None,
        }
    }

    /// Fold one frame snapshot into the view state.
    pub fn apply(&mut self, snapshot: FrameSnapshot) {
        self.history.push_back(snapshot.rates.frame.req_per_s);
        while self.history.len() > RATE_HISTORY_LEN {
            self.history.pop_front();
        }

        // The transition instant only changes on an on/off edge, so a
        // changed date is exactly one new transition to report.
        if snapshot.alert.date != self.last_transition {
            if snapshot.alert.date.is_some() {
                let message = if snapshot.alert.is_on {
                    format::alert_firing(&snapshot.alert)
                } else {
                    format::alert_recovered(&snapshot.alert)
                };
                tracing::info!(alert_on = snapshot.alert.is_on, "{message}");
                self.messages.push_front(message);
                self.messages.truncate(ALERT_LOG_CAPACITY);
            }
            self.last_transition = snapshot.alert.date;
        }

        self.snapshot = Some(snapshot);
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AlertState, Rates};
    use chrono::TimeZone;

    fn snapshot_with(req_per_s: u64, alert: AlertState) -> FrameSnapshot {
        let mut rates = Rates::default();
        rates.frame.req_per_s = req_per_s;
        FrameSnapshot {
            hits: Vec::new(),
            rates,
            codes: Default::default(),
            alert,
        }
    }

    fn idle_alert() -> AlertState {
        AlertState::new(10, Duration::from_secs(120))
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = DashboardState::new(&Config::default());
        for i in 0..(RATE_HISTORY_LEN as u64 + 5) {
            state.apply(snapshot_with(i, idle_alert()));
        }
        assert_eq!(state.history.len(), RATE_HISTORY_LEN);
        assert_eq!(*state.history.front().unwrap(), 5);
        assert_eq!(*state.history.back().unwrap(), RATE_HISTORY_LEN as u64 + 4);
    }

    #[test]
    fn test_no_message_while_alert_never_fired() {
        let mut state = DashboardState::new(&Config::default());
        state.apply(snapshot_with(3, idle_alert()));
        state.apply(snapshot_with(4, idle_alert()));
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_fire_and_recover_edges_produce_one_message_each() {
        let mut state = DashboardState::new(&Config::default());
        let t1 = Utc.with_ymd_and_hms(2020, 2, 9, 16, 27, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2020, 2, 9, 16, 29, 0).unwrap();

        let mut firing = idle_alert();
        firing.is_on = true;
        firing.avg = 12;
        firing.n_reqs = 1440;
        firing.date = Some(t1);

        let mut recovered = idle_alert();
        recovered.date = Some(t2);

        state.apply(snapshot_with(12, firing));
        // Same state re-applied: no duplicate message.
        state.apply(snapshot_with(12, firing));
        state.apply(snapshot_with(1, recovered));

        assert_eq!(state.messages.len(), 2);
        assert!(state.messages[0].starts_with("Traffic is back to normal"));
        assert!(state.messages[1].starts_with("High traffic generated an alert"));
    }
}
