// logmonitor - tasks/mod.rs
//
// The per-frame aggregators and their shared lifecycle.
//
// Each task runs under the same frame lifecycle, driven by the scheduler:
//
//   before_run() → run(..)* → after_run() → (result()) ... close()
//
// `before_run` resets per-frame state; `run` is only invoked while
// `is_done()` is false, so repeated calls within a frame cannot change a
// task's result; `after_run` is the end-of-frame synchronisation hook
// (the fetch task swaps its buffers there). The uniform hooks live in the
// `FrameTask` trait; each task's `run` keeps its own concrete, typed
// signature so a task can never receive an input it cannot consume.

use crate::util::error::Result;

pub mod alert;
pub mod codes;
pub mod fetch;
pub mod rates;
pub mod sections;

pub use alert::Alert;
pub use codes::CountCodes;
pub use fetch::FetchLogs;
pub use rates::MeasureRates;
pub use sections::FindMostHitSections;

/// The uniform part of the aggregator lifecycle.
pub trait FrameTask {
    /// Reset per-frame state at the opening of a frame.
    fn before_run(&mut self);

    /// End-of-frame hook, called once the frame's time budget has expired.
    fn after_run(&mut self) -> Result<()>;

    /// True once the task's per-frame output is ready.
    fn is_done(&self) -> bool;

    /// Shut the task down. It must be re-created to be used again.
    fn close(&mut self);
}
