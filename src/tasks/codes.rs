// logmonitor - tasks/codes.rs
//
// Tallies HTTP status codes across the frame batch. The map is rebuilt
// from scratch each frame.

use crate::core::model::{CodeTally, LogRecord};
use crate::tasks::FrameTask;
use crate::util::error::Result;

pub struct CountCodes {
    codes: CodeTally,
    done: bool,
}

impl CountCodes {
    pub fn new() -> Self {
        Self {
            codes: CodeTally::new(),
            done: false,
        }
    }

    /// Count every status code occurring in the frame batch.
    /// Repeated calls within a frame leave the result unchanged.
    pub fn run(&mut self, batch: &[LogRecord]) {
        if self.done {
            return;
        }
        self.codes.clear();

        for record in batch {
            *self.codes.entry(record.request.code).or_insert(0) += 1;
        }
        self.done = true;
    }

    /// The code → occurrence-count map for this frame.
    pub fn result(&self) -> &CodeTally {
        &self.codes
    }
}

impl Default for CountCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTask for CountCodes {
    fn before_run(&mut self) {
        self.done = false;
        self.codes.clear();
    }

    fn after_run(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn close(&mut self) {
        self.done = false;
        self.codes = CodeTally::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::HttpRequest;
    use chrono::DateTime;

    fn make_record(code: u16) -> LogRecord {
        LogRecord {
            host: "10.0.0.1".to_string(),
            auth_user: String::new(),
            local_time: DateTime::parse_from_rfc3339("2020-02-09T16:27:00+00:00").unwrap(),
            request: HttpRequest {
                method: "GET".to_string(),
                route: "/".to_string(),
                version: "HTTP/1.1".to_string(),
                code,
                size: 100,
            },
        }
    }

    #[test]
    fn test_counts_each_code_occurrence() {
        let batch: Vec<LogRecord> = [200, 201, 404, 500, 500, 302]
            .iter()
            .map(|c| make_record(*c))
            .collect();

        let mut task = CountCodes::new();
        task.before_run();
        task.run(&batch);

        let codes = task.result();
        assert_eq!(codes.get(&200), Some(&1));
        assert_eq!(codes.get(&201), Some(&1));
        assert_eq!(codes.get(&302), Some(&1));
        assert_eq!(codes.get(&404), Some(&1));
        assert_eq!(codes.get(&500), Some(&2));

        // The tally accounts for every request exactly once.
        assert_eq!(codes.values().sum::<u64>(), batch.len() as u64);
    }

    #[test]
    fn test_repeated_run_does_not_change_result() {
        let batch = vec![make_record(200), make_record(404)];
        let mut task = CountCodes::new();
        task.before_run();
        task.run(&batch);
        let first = task.result().clone();

        task.run(&batch);
        assert_eq!(task.result(), &first);
    }

    #[test]
    fn test_before_run_clears_previous_frame() {
        let mut task = CountCodes::new();
        task.before_run();
        task.run(&[make_record(200)]);
        assert_eq!(task.result().len(), 1);

        task.before_run();
        task.run(&[]);
        assert!(task.result().is_empty());
    }
}
