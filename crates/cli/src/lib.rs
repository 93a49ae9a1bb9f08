// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Baseline regression harness for database query scripts.
//!
//! Every script in a directory is run through a database client and its
//! output compared against a recorded baseline. Missing baselines are
//! recorded, mismatches produce a unified diff, and each run ends with a
//! summary, a detailed transcript and a JSON report.
//!
#![doc = include_str!("../README.md")]

pub mod baseline;
pub mod case;
pub mod cli;
pub mod client;
pub mod compare;
pub mod config;
#[doc(hidden)]
pub mod env;
pub mod executor;
pub mod guard;
pub mod interrupt;
#[doc(hidden)]
pub mod output;
pub mod report;
pub mod runner;
pub mod time;

/// Re-exported outcome types from the sqlbaseline-capture crate.
pub mod outcome {
    pub use sqlbaseline_capture::{
        Outcome, OutcomeEntry, OutcomeLog, OverallStatus, RecordedOutcome, Tally,
    };
}

#[cfg(test)]
pub(crate) mod test_helpers;
