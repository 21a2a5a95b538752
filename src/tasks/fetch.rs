// logmonitor - tasks/fetch.rs
//
// The batch-producing task: a frame-lifecycle façade over the
// double-buffered poller. Every other aggregator reads the batch this
// task fetches for the current frame.

use crate::app::poller::Poller;
use crate::core::model::LogRecord;
use crate::tasks::FrameTask;
use crate::util::error::Result;
use std::path::Path;
use std::time::Duration;

pub struct FetchLogs {
    poller: Poller,
    done: bool,
}

impl FetchLogs {
    /// Open the log file and prepare the double-buffered reader.
    pub fn open(path: &Path, read_timeout: Duration) -> Result<Self> {
        Ok(Self {
            poller: Poller::open(path, read_timeout)?,
            done: false,
        })
    }

    /// Refresh the task's view of the committed batch.
    pub fn run(&mut self) {
        self.done = true;
    }

    /// The frame batch. Read-only; stable until the next swap.
    pub fn fetch(&self) -> &[LogRecord] {
        self.poller.read()
    }

    /// Lines rejected by the parser during the current frame.
    pub fn malformed_count(&self) -> u64 {
        self.poller.malformed_count()
    }
}

impl FrameTask for FetchLogs {
    /// Open the frame: (re)start background production.
    fn before_run(&mut self) {
        self.done = false;
        self.poller.run();
    }

    /// Close the frame: commit the accumulated records so they become the
    /// next frame's batch. A latched tail error surfaces here.
    fn after_run(&mut self) -> Result<()> {
        self.poller.swap()
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn close(&mut self) {
        self.done = false;
        self.poller.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TIMEOUT: Duration = Duration::from_millis(40);

    #[test]
    fn test_lifecycle_hands_off_one_frame_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut fetch = FetchLogs::open(&path, TIMEOUT).unwrap();

        fetch.before_run();
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        writeln!(
            file,
            r#"10.0.0.1 - - [09/Feb/2020:16:27:00 +0000] "GET /a HTTP/1.1" 200 100"#
        )
        .unwrap();
        file.flush().unwrap();
        std::thread::sleep(Duration::from_millis(200));

        // Mid-frame: the batch is still the previous (empty) one.
        fetch.run();
        assert!(fetch.is_done());
        assert!(fetch.fetch().is_empty());

        fetch.after_run().unwrap();

        // Next frame sees the committed record.
        fetch.before_run();
        fetch.run();
        assert_eq!(fetch.fetch().len(), 1);
        fetch.close();
    }
}
