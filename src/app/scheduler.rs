// logmonitor - app/scheduler.rs
//
// Owns the frame clock and drives the aggregator lifecycle. One frame:
//
//   1. before_run on every task (opens the frame, restarts production)
//   2. poll the tasks until the frame budget expires; the snapshot is
//      pushed as soon as every per-frame task is done, not at frame end
//   3. after_run on every task (the fetch task swaps its buffers here,
//      committing the next frame's batch)
//
// The loop never suspends on the clock while work is pending; once the
// frame's snapshot has been emitted it idles in short ticks. A single
// cancel flag ends the loop at a step boundary, after which every task is
// closed.
//
// Snapshots travel over a rendezvous channel. If the renderer has not yet
// taken the previous snapshot the new one is dropped and counted — the
// frame clock and the buffer rotation advance regardless.

use crate::app::config::Config;
use crate::core::clock::SystemClock;
use crate::core::model::FrameSnapshot;
use crate::tasks::{
    Alert, CountCodes, FetchLogs, FindMostHitSections, FrameTask, MeasureRates,
};
use crate::util::constants::{SCHEDULER_IDLE_TICK_MS, TAIL_READ_TIMEOUT_MS};
use crate::util::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{SyncSender, TrySendError};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Scheduler {
    fetch: FetchLogs,
    sections: FindMostHitSections,
    rates: MeasureRates,
    codes: CountCodes,
    alert: Alert,
    clock: SystemClock,
    frame_duration: Duration,
    frame_secs: u64,
    tx: SyncSender<FrameSnapshot>,
    cancel: Arc<AtomicBool>,
    dropped_snapshots: u64,
}

impl Scheduler {
    /// Open the pipeline against the configured log file. Fails fast if
    /// the file cannot be opened or created.
    pub fn open(
        config: &Config,
        tx: SyncSender<FrameSnapshot>,
        cancel: Arc<AtomicBool>,
    ) -> Result<Self> {
        let read_timeout = Duration::from_millis(TAIL_READ_TIMEOUT_MS);
        Ok(Self {
            fetch: FetchLogs::open(&config.log_path, read_timeout)?,
            sections: FindMostHitSections::new(),
            rates: MeasureRates::new(),
            codes: CountCodes::new(),
            alert: Alert::new(config.alert_period, config.alert_threshold),
            clock: SystemClock,
            frame_duration: config.frame_duration,
            frame_secs: config.frame_duration.as_secs().max(1),
            tx,
            cancel,
            dropped_snapshots: 0,
        })
    }

    /// Run frames until cancelled or a tail error surfaces. Every task is
    /// closed on the way out.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            frame_secs = self.frame_secs,
            "Scheduler started"
        );

        let result = self.frame_loop();

        for task in self.tasks() {
            task.close();
        }

        match &result {
            Ok(()) => tracing::info!(
                dropped_snapshots = self.dropped_snapshots,
                "Scheduler stopped"
            ),
            Err(e) => tracing::error!(error = %e, "Scheduler failed"),
        }
        result
    }

    fn frame_loop(&mut self) -> Result<()> {
        while !self.cancel.load(Ordering::SeqCst) {
            self.run_frame()?;
        }
        Ok(())
    }

    /// One full frame: lifecycle, poll loop, snapshot, swap.
    fn run_frame(&mut self) -> Result<()> {
        let start = Instant::now();

        for task in self.tasks() {
            task.before_run();
        }

        let mut all_done = false;
        let mut sent = false;
        let mut alert_ran = false;

        while start.elapsed() < self.frame_duration {
            if self.cancel.load(Ordering::SeqCst) {
                return Ok(());
            }

            if !self.fetch.is_done() {
                self.fetch.run();
            }
            let batch = self.fetch.fetch();

            if !self.sections.is_done() {
                self.sections.run(batch);
            }
            if !self.rates.is_done() {
                self.rates.run(batch, self.frame_secs);
            }
            if !self.codes.is_done() {
                self.codes.run(batch);
            }

            // The alert never reports done; its per-frame update fires
            // exactly once, as soon as the rates are in.
            if !alert_ran && self.rates.is_done() {
                self.alert.run(self.rates.result(), &self.clock);
                alert_ran = true;
                all_done = true;
            }

            if all_done && !sent {
                let snapshot = FrameSnapshot {
                    hits: self.sections.result().to_vec(),
                    rates: self.rates.result(),
                    codes: self.codes.result().clone(),
                    alert: self.alert.result(),
                };
                match self.tx.try_send(snapshot) {
                    Ok(()) => sent = true,
                    Err(TrySendError::Full(_)) => {
                        // Renderer mid-draw; retry on the next tick. If the
                        // whole frame passes without a rendezvous the
                        // snapshot is dropped and the clock advances anyway.
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        tracing::info!("Snapshot consumer gone, stopping");
                        self.cancel.store(true, Ordering::SeqCst);
                        return Ok(());
                    }
                }
            }

            // Frame work is finished; idle out the rest of the window in
            // cancellable ticks.
            if all_done {
                let remaining = self.frame_duration.saturating_sub(start.elapsed());
                if !remaining.is_zero() {
                    std::thread::sleep(
                        Duration::from_millis(SCHEDULER_IDLE_TICK_MS).min(remaining),
                    );
                }
            }
        }

        if all_done && !sent {
            self.dropped_snapshots += 1;
            tracing::debug!(
                dropped = self.dropped_snapshots,
                "Renderer never took this frame's snapshot, dropping it"
            );
        }

        let malformed = self.fetch.malformed_count();
        if malformed > 0 {
            tracing::debug!(malformed, "Frame dropped malformed lines");
        }

        for task in self.tasks() {
            task.after_run()?;
        }

        Ok(())
    }

    fn tasks(&mut self) -> [&mut dyn FrameTask; 5] {
        [
            &mut self.fetch,
            &mut self.sections,
            &mut self.rates,
            &mut self.codes,
            &mut self.alert,
        ]
    }
}

// =============================================================================
// Unit tests
// =============================================================================
