// logmonitor - app/poller.rs
//
// Double-buffered hand-off between the tail reader worker and the frame
// aggregators. Two owned buffers and a write index: while a frame is open
// the async buffer accumulates on its own thread, and consumers read the
// batch committed at the previous swap. `swap()` stops production, moves
// the accumulated vector into the write buffer, toggles the index, and
// flushes — so a batch is always atomically complete and never observed
// half-written. The cost is keeping one extra frame's worth of records
// alive.

use crate::app::buffer::AsyncBuffer;
use crate::app::tail::TailReader;
use crate::core::model::LogRecord;
use crate::util::error::Result;
use std::path::Path;
use std::time::Duration;

pub struct Poller {
    buffer: AsyncBuffer,
    /// Index of the buffer the next swap writes into; consumers read the
    /// other one.
    wbuf: usize,
    buffers: [Vec<LogRecord>; 2],
}

impl Poller {
    /// Open the log file for tailing. The reader starts at end-of-file.
    pub fn open(path: &Path, read_timeout: Duration) -> Result<Self> {
        let reader = TailReader::open(path, read_timeout)?;
        Ok(Self {
            buffer: AsyncBuffer::new(reader),
            wbuf: 0,
            buffers: [Vec::new(), Vec::new()],
        })
    }

    /// Start background production for the current frame. Idempotent
    /// within a frame.
    pub fn run(&mut self) {
        self.buffer.start();
    }

    /// The batch committed by the last `swap()`. Non-blocking; never
    /// observes a partial batch.
    pub fn read(&self) -> &[LogRecord] {
        &self.buffers[next_buf(self.wbuf)]
    }

    /// Lines the parser rejected since the last swap.
    pub fn malformed_count(&self) -> u64 {
        self.buffer.malformed_count()
    }

    /// Commit the frame: stop production, move the accumulated records
    /// into the write buffer, toggle, and flush the async buffer so the
    /// next frame starts empty.
    ///
    /// A latched tail error surfaces here and leaves the committed batch
    /// untouched.
    pub fn swap(&mut self) -> Result<()> {
        self.buffer.stop();
        if let Some(err) = self.buffer.take_error() {
            return Err(err);
        }

        self.buffers[self.wbuf] = self.buffer.take_records();
        self.wbuf = next_buf(self.wbuf);
        self.buffer.flush();

        Ok(())
    }

    /// Stop production and release both buffers.
    pub fn close(&mut self) {
        self.buffer.close();
        self.buffers = [Vec::new(), Vec::new()];
    }
}

fn next_buf(index: usize) -> usize {
    (index + 1) % 2
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    const TIMEOUT: Duration = Duration::from_millis(40);

    fn append(path: &Path, text: &str) {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    fn clf_line(route: &str) -> String {
        format!(r#"10.0.0.1 - - [09/Feb/2020:16:27:00 +0000] "GET {route} HTTP/1.1" 200 100"#)
    }

    #[test]
    fn test_read_is_empty_before_first_swap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let poller = Poller::open(&path, TIMEOUT).unwrap();
        assert!(poller.read().is_empty());
    }

    #[test]
    fn test_swap_commits_the_accumulated_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut poller = Poller::open(&path, TIMEOUT).unwrap();

        poller.run();
        append(&path, &format!("{}\n{}\n", clf_line("/a"), clf_line("/b")));
        std::thread::sleep(Duration::from_millis(200));
        poller.swap().unwrap();

        let batch = poller.read();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].request.route, "/a");
        assert_eq!(batch[1].request.route, "/b");
    }

    #[test]
    fn test_batches_do_not_leak_across_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut poller = Poller::open(&path, TIMEOUT).unwrap();

        // Frame 1: one record.
        poller.run();
        append(&path, &format!("{}\n", clf_line("/frame1")));
        std::thread::sleep(Duration::from_millis(200));
        poller.swap().unwrap();
        assert_eq!(poller.read().len(), 1);

        // Frame 2: idle. The committed batch must be frame 2's (empty),
        // not a stale copy of frame 1.
        poller.run();
        std::thread::sleep(Duration::from_millis(100));
        poller.swap().unwrap();
        assert!(poller.read().is_empty());
    }

    #[test]
    fn test_read_is_stable_between_swaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut poller = Poller::open(&path, TIMEOUT).unwrap();

        poller.run();
        append(&path, &format!("{}\n", clf_line("/committed")));
        std::thread::sleep(Duration::from_millis(200));
        poller.swap().unwrap();

        // New production is running, but reads keep returning the
        // committed batch until the next swap.
        poller.run();
        append(&path, &format!("{}\n", clf_line("/inflight")));
        let batch = poller.read();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].request.route, "/committed");
        poller.close();
    }
}
