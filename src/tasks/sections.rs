// logmonitor - tasks/sections.rs
//
// Groups the frame batch by URL section and ranks sections by hit count.
// A section is the path prefix up to (but not including) the second `/`.
// Rebuilt from scratch every frame.

use crate::core::model::{Hit, LogRecord};
use crate::tasks::FrameTask;
use crate::util::error::Result;
use std::collections::HashMap;

pub struct FindMostHitSections {
    /// Hits in rank order. Until the sort at the end of `run`, the order
    /// is first occurrence within the frame — which is exactly what breaks
    /// ties after the stable sort.
    hits: Vec<Hit>,
    /// section → index into `hits`.
    index: HashMap<String, usize>,
    done: bool,
}

impl FindMostHitSections {
    pub fn new() -> Self {
        Self {
            hits: Vec::new(),
            index: HashMap::new(),
            done: false,
        }
    }

    /// Aggregate the frame batch by section, then sort by total descending.
    /// Records whose route contains no `/` are excluded from hit accounting.
    ///
    /// Repeated calls within a frame leave the result unchanged.
    pub fn run(&mut self, batch: &[LogRecord]) {
        if self.done {
            return;
        }
        self.hits.clear();
        self.index.clear();

        for record in batch {
            let Some(section) = extract_section(&record.request.route) else {
                continue;
            };
            let idx = *self.index.entry(section.clone()).or_insert_with(|| {
                self.hits.push(Hit::new(&section));
                self.hits.len() - 1
            });
            self.hits[idx].record(&record.request.method);
        }

        // Stable: equal totals keep their first-occurrence order.
        self.hits.sort_by(|a, b| b.total.cmp(&a.total));

        self.done = true;
    }

    /// The ranked hits for this frame.
    pub fn result(&self) -> &[Hit] {
        &self.hits
    }
}

impl Default for FindMostHitSections {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTask for FindMostHitSections {
    fn before_run(&mut self) {
        self.done = false;
        self.hits.clear();
        self.index.clear();
    }

    fn after_run(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn close(&mut self) {
        self.done = false;
        self.hits = Vec::new();
        self.index = HashMap::new();
    }
}

/// The part of `route` before the second `/`.
///
/// Returns `/` for a root-level path (`/index.html`) and `None` for a
/// route containing no `/` at all — such records are excluded rather than
/// rejected upstream, since proxies and odd server configs do emit them.
pub fn extract_section(route: &str) -> Option<String> {
    let parts: Vec<&str> = route.split('/').collect();
    match parts.len() {
        0 | 1 => None,
        2 => Some("/".to_string()),
        _ => Some(format!("/{}", parts[1])),
    }
}

// =============================================================================
// Unit tests
// =============================================================================
