// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console output: diagnostics on stderr, progress and summary on stdout.
//!
//! Provides ANSI color support with automatic terminal detection.

use crate::env;
use sqlbaseline_capture::{Outcome, OverallStatus, Tally};
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The filter comes from `SQLBASELINE_LOG`, falling back to `warn`. Events go
/// to stderr so they never interleave with the progress stream on stdout.
pub fn init_tracing() {
    let filter = env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(env::DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Print an error message to stderr.
///
/// Displays in red when stderr is a terminal, plain text otherwise.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

/// Write an error message to a writer with explicit terminal flag.
fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[31mError: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Error: {}", msg);
    }
}

/// Print a warning message to stderr.
///
/// Displays in yellow when stderr is a terminal, plain text otherwise.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_warning(&mut io::stderr(), msg, is_tty);
}

/// Write a warning message to a writer with explicit terminal flag.
fn write_warning<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[33mWarning: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Warning: {}", msg);
    }
}

/// Print one finalized test case to stdout as it completes.
pub fn print_progress(done: usize, total: usize, test_id: &str, outcome: Outcome) {
    let is_tty = io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();
    write_progress(&mut stdout, done, total, test_id, outcome, is_tty);
    let _ = stdout.flush();
}

fn write_progress<W: Write>(
    writer: &mut W,
    done: usize,
    total: usize,
    test_id: &str,
    outcome: Outcome,
    is_terminal: bool,
) {
    let label = if is_terminal {
        let color = match outcome {
            Outcome::Passed => "32",
            Outcome::New => "36",
            Outcome::Failed | Outcome::ExecutionError => "31",
        };
        format!("\x1b[{}m{}\x1b[0m", color, outcome.label())
    } else {
        outcome.label().to_string()
    };
    let _ = writeln!(writer, "[{}/{}] {} ... {}", done, total, test_id, label);
}

/// Print the end-of-run summary to stdout.
pub fn print_summary(tally: &Tally, status: OverallStatus, report_path: &std::path::Path) {
    write_summary(&mut io::stdout().lock(), tally, status, report_path);
}

fn write_summary<W: Write>(
    writer: &mut W,
    tally: &Tally,
    status: OverallStatus,
    report_path: &std::path::Path,
) {
    let _ = writeln!(writer);
    let _ = writeln!(
        writer,
        "{} total, {} passed, {} failed, {} new: {}",
        tally.total, tally.passed, tally.failed, tally.new, status
    );
    let _ = writeln!(writer, "Report: {}", report_path.display());
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
