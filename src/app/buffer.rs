// logmonitor - app/buffer.rs
//
// Turns the pull-based `TailReader` into a background producer: a worker
// thread loops `next()` and appends parsed records to a vector that is
// handed back to the owner when the worker is stopped.
//
// State machine: Idle → Running (after `start`) → Idle (after `stop`).
// Single producer (the worker), single consumer (the scheduler); only one
// start/stop cycle is in flight at any time. The worker's writes become
// visible to the consumer through the join performed by `stop()`.
//
// Failure domain: a malformed line is counted and dropped, never fatal.
// A timed-out read (`Ok(None)`) is absorbed and the loop continues. An I/O
// error latches, stops the worker, and is surfaced on the next `read()`.

use crate::app::tail::TailReader;
use crate::core::model::LogRecord;
use crate::core::parser;
use crate::util::error::MonitorError;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

pub struct AsyncBuffer {
    path: PathBuf,
    /// The tail reader, held here while idle and moved into the worker
    /// thread while running.
    reader: Option<TailReader>,
    records: Vec<LogRecord>,
    error: Option<MonitorError>,
    malformed: u64,
    worker: Option<Worker>,
}

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<WorkerExit>,
}

/// Everything the worker thread hands back on join.
struct WorkerExit {
    reader: TailReader,
    records: Vec<LogRecord>,
    error: Option<MonitorError>,
    malformed: u64,
}

impl AsyncBuffer {
    pub fn new(reader: TailReader) -> Self {
        Self {
            path: reader.path().to_path_buf(),
            reader: Some(reader),
            records: Vec::new(),
            error: None,
            malformed: 0,
            worker: None,
        }
    }

    /// Spawn the reader worker. Idempotent: a second call while running is
    /// a no-op.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let Some(reader) = self.reader.take() else {
            // The reader was lost to a worker panic; the latched error is
            // already waiting for the consumer.
            return;
        };

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let path = self.path.clone();

        let spawned = std::thread::Builder::new()
            .name("tail-reader".to_string())
            .spawn(move || run_reader(reader, path, stop_flag));

        match spawned {
            Ok(handle) => self.worker = Some(Worker { stop, handle }),
            Err(e) => {
                tracing::error!(error = %e, "Cannot spawn tail-reader worker");
                self.error = Some(MonitorError::TailLost {
                    path: self.path.clone(),
                    source: e,
                });
            }
        }
    }

    /// Signal the worker and block until it has exited, folding its output
    /// back into this buffer. The worker wakes within one tail read timeout.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.stop.store(true, Ordering::SeqCst);

        match worker.handle.join() {
            Ok(exit) => {
                self.reader = Some(exit.reader);
                if self.records.is_empty() {
                    self.records = exit.records;
                } else {
                    self.records.extend(exit.records);
                }
                self.malformed += exit.malformed;
                if self.error.is_none() {
                    self.error = exit.error;
                }
            }
            Err(_) => {
                tracing::error!(file = %self.path.display(), "Tail-reader worker panicked");
                self.error = Some(MonitorError::TailLost {
                    path: self.path.clone(),
                    source: io::Error::other("reader worker panicked"),
                });
            }
        }
    }

    /// The records accumulated so far plus the latched error, if any.
    /// Call `stop()` first for a stable view.
    pub fn read(&self) -> (&[LogRecord], Option<&MonitorError>) {
        (&self.records, self.error.as_ref())
    }

    /// Move the accumulated records out without copying. Callers must have
    /// stopped the worker first.
    pub fn take_records(&mut self) -> Vec<LogRecord> {
        debug_assert!(self.worker.is_none(), "take_records while running");
        std::mem::take(&mut self.records)
    }

    /// Move the latched error out, if any.
    pub fn take_error(&mut self) -> Option<MonitorError> {
        self.error.take()
    }

    /// Clear the buffer and the latched error. Callers must have stopped
    /// the worker first.
    pub fn flush(&mut self) {
        debug_assert!(self.worker.is_none(), "flush while running");
        self.records.clear();
        self.error = None;
        self.malformed = 0;
    }

    /// Lines rejected by the parser since the last flush.
    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop production and release the reader.
    pub fn close(&mut self) {
        self.stop();
        if let Some(reader) = self.reader.as_mut() {
            reader.close();
        }
    }
}

/// Worker loop: read lines until stopped or an unrecoverable error latches.
fn run_reader(mut reader: TailReader, path: PathBuf, stop: Arc<AtomicBool>) -> WorkerExit {
    let mut records = Vec::new();
    let mut malformed: u64 = 0;
    let mut error = None;

    while !stop.load(Ordering::SeqCst) {
        match reader.next() {
            Ok(Some(line)) => match parser::parse(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    malformed += 1;
                    tracing::debug!(error = %e, "Dropping malformed log line");
                }
            },
            // No data within the read timeout; loop back to the stop check.
            Ok(None) => {}
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Tail read failed");
                error = Some(MonitorError::TailLost { path, source: e });
                break;
            }
        }
    }

    WorkerExit {
        reader,
        records,
        error,
        malformed,
    }
}

// =============================================================================
// Unit tests
// =============================================================================
