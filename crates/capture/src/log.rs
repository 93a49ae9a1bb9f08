// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome log implementation.

use crate::outcome::{OutcomeEntry, RecordedOutcome};
use crate::tally::{OverallStatus, Tally};
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Ordered log of per-test outcomes for one run
pub struct OutcomeLog {
    outcomes: Arc<Mutex<Vec<RecordedOutcome>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl OutcomeLog {
    /// Create a new in-memory outcome log
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create an outcome log that also streams records to a file (JSONL format)
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record the outcome of the next test in discovery order
    pub fn record(&self, entry: OutcomeEntry) -> RecordedOutcome {
        let mut outcomes = self.outcomes.lock();
        let seq = outcomes.len() as u64;
        let recorded = RecordedOutcome {
            seq,
            test_id: entry.test_id,
            outcome: entry.outcome,
            elapsed: entry.elapsed,
            timestamp: SystemTime::now(),
            detail: entry.detail,
        };

        outcomes.push(recorded.clone());

        // Transcript writes are best-effort; the in-memory log is authoritative
        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&recorded) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        recorded
    }

    /// Get all recorded outcomes in discovery order
    pub fn outcomes(&self) -> Vec<RecordedOutcome> {
        self.outcomes.lock().clone()
    }

    /// Aggregate counts over everything recorded so far
    pub fn tally(&self) -> Tally {
        Tally::from_outcomes(self.outcomes.lock().iter().map(|o| o.outcome))
    }

    /// Overall status over everything recorded so far
    pub fn overall_status(&self) -> OverallStatus {
        self.tally().status()
    }
}

impl Default for OutcomeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OutcomeLog {
    fn clone(&self) -> Self {
        Self {
            outcomes: Arc::clone(&self.outcomes),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
