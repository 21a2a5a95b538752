// logmonitor - tasks/rates.rs
//
// Computes the per-frame request rates and folds them into the global
// (process-lifetime) aggregates: incremental mean and running maximum of
// the per-frame request rate.

use crate::core::model::{LogRecord, Rates};
use crate::tasks::FrameTask;
use crate::util::error::Result;

pub struct MeasureRates {
    rates: Rates,
    done: bool,
}

impl MeasureRates {
    pub fn new() -> Self {
        Self {
            rates: Rates::default(),
            done: false,
        }
    }

    /// Measure the frame batch over a frame of `frame_duration_s` seconds.
    ///
    /// Repeated calls within a frame leave the result unchanged: the
    /// global aggregates fold each frame exactly once.
    pub fn run(&mut self, batch: &[LogRecord], frame_duration_s: u64) {
        if self.done {
            return;
        }
        self.compute_frame_rates(batch, frame_duration_s);
        self.compute_global_rates();
        self.done = true;
    }

    /// A copy of the measured rates.
    pub fn result(&self) -> Rates {
        self.rates
    }

    fn compute_frame_rates(&mut self, batch: &[LogRecord], frame_duration_s: u64) {
        let frame = &mut self.rates.frame;

        // Every log line is one HTTP request.
        frame.n_requests = batch.len() as u64;
        frame.duration_s = frame_duration_s;
        frame.req_per_s = frame.n_requests / frame_duration_s.max(1);

        let n_success = batch.iter().filter(|r| r.request.code < 400).count() as u64;
        frame.n_success = n_success;
        frame.n_failures = frame.n_requests - n_success;
    }

    fn compute_global_rates(&mut self) {
        let frame = &self.rates.frame;
        let global = &mut self.rates.global;

        if frame.req_per_s > global.max_req_per_s {
            global.max_req_per_s = frame.req_per_s;
        }

        if global.n_measures >= 1 {
            global.avg_req_per_s = (global.avg_req_per_s * global.n_measures + frame.req_per_s)
                / (global.n_measures + 1);
        } else {
            global.avg_req_per_s = frame.req_per_s;
        }
        global.n_measures += 1;
    }
}

impl Default for MeasureRates {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTask for MeasureRates {
    fn before_run(&mut self) {
        self.done = false;
    }

    fn after_run(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn close(&mut self) {
        self.done = false;
        self.rates = Rates::default();
    }
}

// =============================================================================
// Unit tests
// =============================================================================
