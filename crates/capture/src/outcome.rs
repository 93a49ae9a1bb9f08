// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-test outcome types.

use crate::duration_serde;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Result of running one test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fresh output matched the recorded baseline
    Passed,
    /// Fresh output differed from the recorded baseline
    Failed,
    /// No baseline existed; the fresh output became the baseline
    New,
    /// The database client could not produce output
    ExecutionError,
}

impl Outcome {
    /// Label shown in reports and progress lines.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Passed => "Passed",
            Outcome::Failed => "Failed",
            Outcome::New => "New",
            Outcome::ExecutionError => "Execution error",
        }
    }

    /// `ExecutionError` counts as a failure when tallying.
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Failed | Outcome::ExecutionError)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input to [`OutcomeLog::record`](crate::OutcomeLog::record).
#[derive(Clone, Debug)]
pub struct OutcomeEntry {
    pub test_id: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
    pub detail: Option<String>,
}

impl OutcomeEntry {
    /// Create an entry with zero elapsed time and no detail
    pub fn new(test_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            test_id: test_id.into(),
            outcome,
            elapsed: Duration::ZERO,
            detail: None,
        }
    }

    /// Set execution time
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Set detail note
    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

/// Recorded outcome with its position in the run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedOutcome {
    /// 0-based position in discovery order
    pub seq: u64,

    /// Test identity (script base name)
    pub test_id: String,

    pub outcome: Outcome,

    /// Time spent executing the script
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,

    /// Wall-clock time the outcome was recorded
    pub timestamp: SystemTime,

    /// Error message or diff summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RecordedOutcome {
    /// 1-based sequence number as shown in reports.
    pub fn position(&self) -> u64 {
        self.seq + 1
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
