// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome recording for sqlbaseline runs.
//!
//! This crate holds the per-test outcome vocabulary and the ordered log the
//! run controller appends to, along with the tally and overall status that
//! the summary report is rendered from.

mod duration_serde;
mod log;
mod outcome;
mod tally;

pub use log::OutcomeLog;
pub use outcome::{Outcome, OutcomeEntry, RecordedOutcome};
pub use tally::{OverallStatus, Tally};
