// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate counts and overall run status.

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome counts for a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
}

impl Tally {
    /// Count outcomes from a sequence.
    pub fn from_outcomes<I: IntoIterator<Item = Outcome>>(outcomes: I) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut tally, outcome| {
            tally.add(outcome);
            tally
        })
    }

    /// Add a single outcome.
    pub fn add(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::New => self.new += 1,
            Outcome::Failed | Outcome::ExecutionError => self.failed += 1,
        }
    }

    /// Overall status per the summary policy.
    pub fn status(&self) -> OverallStatus {
        if self.failed > 0 {
            OverallStatus::FailuresPresent
        } else if self.passed == self.total {
            OverallStatus::AllPassed
        } else {
            OverallStatus::PassedWithNewBaselines
        }
    }

    /// Percentage of tests that did not fail (new baselines count as passing).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.failed) as f64 / self.total as f64 * 100.0
    }
}

/// Overall run status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    AllPassed,
    PassedWithNewBaselines,
    FailuresPresent,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::AllPassed => "all passed",
            OverallStatus::PassedWithNewBaselines => "passed with new baselines",
            OverallStatus::FailuresPresent => "failures present",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "tally_tests.rs"]
mod tests;
