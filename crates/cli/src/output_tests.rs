// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::path::Path;

#[test]
fn error_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "no scripts found", false);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "Error: no scripts found\n");
}

#[test]
fn error_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "no scripts found", true);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "\x1b[31mError: no scripts found\x1b[0m\n");
}

#[test]
fn warning_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, format_args!("retrying {} times", 5), false);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "Warning: retrying 5 times\n");
}

#[test]
fn warning_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, "signal handlers unavailable", true);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "\x1b[33mWarning: signal handlers unavailable\x1b[0m\n");
}

#[test]
fn progress_plain_text() {
    let mut buf = Vec::new();
    write_progress(&mut buf, 2, 5, "orders", Outcome::Failed, false);
    assert_eq!(String::from_utf8(buf).unwrap(), "[2/5] orders ... Failed\n");
}

#[test]
fn progress_colors_outcome_on_terminal() {
    let mut buf = Vec::new();
    write_progress(&mut buf, 1, 1, "orders", Outcome::Passed, true);
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "[1/1] orders ... \x1b[32mPassed\x1b[0m\n"
    );
}

#[test]
fn summary_lists_counts_and_report() {
    let tally = Tally::from_outcomes([Outcome::Passed, Outcome::New]);
    let mut buf = Vec::new();
    write_summary(
        &mut buf,
        &tally,
        tally.status(),
        Path::new("reports/report_20261019_083015.txt"),
    );
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(
        output,
        "\n2 total, 1 passed, 0 failed, 1 new: passed with new baselines\n\
         Report: reports/report_20261019_083015.txt\n"
    );
}
