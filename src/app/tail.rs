// logmonitor - app/tail.rs
//
// Follows an append-only log file, like `tail -F`: reading starts at the
// end of the file at open time, truncation and rotation are survived, and
// a file that disappears is picked up again when it reappears.
//
// The reader is poll-based: each tick stats the file, reads any appended
// bytes (bounded per tick), and splits complete lines at the last newline.
// Bytes after the final newline are an in-progress line and are carried to
// the next tick in a bounded partial buffer.
//
// `next()` is the pull interface the async buffer's worker loops on: it
// returns the next complete line, or `None` once `read_timeout` elapses
// with no line available. `None` is a normal, repeatable outcome — it is
// what lets the worker notice its stop flag while the log is idle.

use crate::util::constants::{
    MAX_TAIL_PARTIAL_BYTES, MAX_TAIL_READ_BYTES_PER_TICK, TAIL_POLL_INTERVAL_MS,
};
use crate::util::error::MonitorError;
use std::collections::VecDeque;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct TailReader {
    path: PathBuf,
    read_timeout: Duration,
    /// Byte position of the last byte consumed from the file.
    offset: u64,
    /// Bytes after the final newline of the last read — an in-progress line.
    partial: String,
    /// Complete lines not yet handed out by `next()`.
    pending: VecDeque<String>,
}

impl TailReader {
    /// Open `path` for tailing, creating the file if it does not exist yet,
    /// and position the reader at the current end of file.
    pub fn open(path: &Path, read_timeout: Duration) -> Result<Self, MonitorError> {
        // Create-if-absent so monitoring can start before the server does,
        // then verify the file is actually readable.
        let open_err = |source| MonitorError::Open {
            path: path.to_path_buf(),
            source,
        };
        match std::fs::File::open(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                std::fs::File::create(path).map_err(open_err)?;
            }
            Err(e) => return Err(open_err(e)),
        }

        let size = std::fs::metadata(path).map_err(open_err)?.len();
        tracing::debug!(file = %path.display(), offset = size, "Tail opened at end of file");

        Ok(Self {
            path: path.to_path_buf(),
            read_timeout,
            offset: size,
            partial: String::new(),
            pending: VecDeque::new(),
        })
    }

    /// Return the next appended line, or `None` if no complete line has
    /// appeared within `read_timeout`.
    ///
    /// Errors are unrecoverable I/O only; a vanished file is not an error
    /// (the reader keeps polling for it to reappear).
    pub fn next(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }

        let deadline = Instant::now() + self.read_timeout;
        loop {
            self.poll_once()?;
            if let Some(line) = self.pending.pop_front() {
                return Ok(Some(line));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let tick = Duration::from_millis(TAIL_POLL_INTERVAL_MS).min(deadline - now);
            std::thread::sleep(tick);
        }
    }

    /// The file this reader follows.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the reader's buffered state. Safe to call multiple times.
    pub fn close(&mut self) {
        self.pending.clear();
        self.partial.clear();
    }

    /// One poll tick: stat, handle rotation, read appended bytes, split lines.
    fn poll_once(&mut self) -> io::Result<()> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Rotation in progress: the file will be re-read from the
                // start once it reappears.
                if self.offset != 0 || !self.partial.is_empty() {
                    tracing::info!(file = %self.path.display(), "Tail: file vanished, awaiting reappearance");
                    self.offset = 0;
                    self.partial.clear();
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if size < self.offset {
            tracing::info!(
                file = %self.path.display(),
                old_offset = self.offset,
                new_size = size,
                "Tail: file truncated or rotated, resetting offset"
            );
            self.offset = 0;
            self.partial.clear();
        }

        if size == self.offset {
            return Ok(());
        }

        let available = usize::try_from(size - self.offset).unwrap_or(usize::MAX);
        let limit = available.min(MAX_TAIL_READ_BYTES_PER_TICK);
        let bytes = match read_bytes_at(&self.path, self.offset, limit) {
            Ok(b) => b,
            // Lost a race with rotation between stat and read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if bytes.is_empty() {
            return Ok(());
        }

        // The bytes are consumed whether or not they complete a line.
        self.offset += bytes.len() as u64;

        let decoded = String::from_utf8_lossy(&bytes);
        self.partial.push_str(&decoded);

        if self.partial.len() > MAX_TAIL_PARTIAL_BYTES {
            tracing::warn!(
                file = %self.path.display(),
                partial_bytes = self.partial.len(),
                limit = MAX_TAIL_PARTIAL_BYTES,
                "Tail: partial buffer exceeded limit, discarding fragment"
            );
            self.partial.clear();
            return Ok(());
        }

        // Everything up to and including the final '\n' is complete; the
        // remainder carries over to the next tick.
        if let Some(nl_pos) = self.partial.rfind('\n') {
            let rest = self.partial.split_off(nl_pos + 1);
            let complete = std::mem::replace(&mut self.partial, rest);
            for line in complete.lines() {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if !line.is_empty() {
                    self.pending.push_back(line.to_string());
                }
            }
        }

        Ok(())
    }
}

/// Read up to `limit` bytes from `path` starting at byte position `offset`.
fn read_bytes_at(path: &Path, offset: u64, limit: usize) -> io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; limit];
    let n = file.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

// =============================================================================
// Unit tests
// =============================================================================
