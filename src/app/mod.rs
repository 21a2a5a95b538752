// logmonitor - app/mod.rs
//
// Pipeline plumbing: tailing, buffering, scheduling, configuration —
// everything between the raw log file and the dashboard.

pub mod buffer;
pub mod config;
pub mod poller;
pub mod scheduler;
pub mod tail;

use crate::core::model::FrameSnapshot;
use crate::ui;
use crate::util::error::Result;
use config::Config;
use scheduler::Scheduler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// Run the whole application: the scheduler on a background thread, the
/// dashboard on the calling thread, joined on shutdown.
///
/// Returns when the user quits (Esc / Ctrl-C) or a fatal pipeline or
/// render error occurs.
pub fn run(config: &Config) -> Result<()> {
    // Rendezvous channel: one snapshot in flight, natural backpressure.
    let (tx, rx) = mpsc::sync_channel::<FrameSnapshot>(0);
    let cancel = Arc::new(AtomicBool::new(false));

    // Open the pipeline before touching the terminal so startup errors
    // print normally.
    let mut scheduler = Scheduler::open(config, tx, Arc::clone(&cancel))?;

    let handle = std::thread::spawn(move || scheduler.run());

    let ui_result = ui::dashboard::run(config, rx, Arc::clone(&cancel));

    // Whichever side finished first, bring the other one down too.
    cancel.store(true, Ordering::SeqCst);
    let scheduler_result = match handle.join() {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Scheduler thread panicked");
            Ok(())
        }
    };

    ui_result.and(scheduler_result)
}
