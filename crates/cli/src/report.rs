// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run reports.
//!
//! A completed run produces three files in the reports directory, all named
//! after the run's UTC start-of-report timestamp:
//!
//! - `report_<ts>.txt`: header, counts, status and one line per test
//! - `detailed_report_<ts>.txt`: full transcript including diffs
//! - `report_<ts>.json`: machine-readable summary

use crate::case::TestCase;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlbaseline_capture::{Outcome, OverallStatus, RecordedOutcome, Tally};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// File name timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// One finalized test case as it appears in the reports.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    pub case: TestCase,
    pub recorded: RecordedOutcome,
    /// Diff text for failed comparisons
    pub diff: Option<String>,
}

/// Where a report set was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub detailed: PathBuf,
    pub json: PathBuf,
}

/// Summary of a completed run, in discovery order.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub tally: Tally,
    pub status: OverallStatus,
    pub entries: Vec<ReportEntry>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    run_id: String,
    total: usize,
    passed: usize,
    failed: usize,
    new: usize,
    status: OverallStatus,
    success_rate: f64,
    tests: Vec<JsonTest<'a>>,
}

#[derive(Serialize)]
struct JsonTest<'a> {
    seq: u64,
    id: &'a str,
    script: &'a Path,
    outcome: Outcome,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff_file: Option<&'a Path>,
}

impl RunReport {
    /// Assemble a report from the run's aggregate and its per-test entries.
    pub fn new(
        run_id: Uuid,
        generated_at: DateTime<Utc>,
        tally: Tally,
        status: OverallStatus,
        entries: Vec<ReportEntry>,
    ) -> Self {
        Self {
            run_id,
            generated_at,
            tally,
            status,
            entries,
        }
    }

    /// Timestamp used in report file names.
    pub fn file_stamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    fn write_header(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(out, "Run: {}", self.run_id);
        let _ = writeln!(out);
    }

    /// Summary report text.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        self.write_header(&mut out);

        let rows = [
            ("Total", self.tally.total),
            ("Passed", self.tally.passed),
            ("Failed", self.tally.failed),
            ("New", self.tally.new),
        ];
        let _ = writeln!(out, "{:<8}{:>7}", "Outcome", "Count");
        let _ = writeln!(out, "{:<8}{:>7}", "-------", "-----");
        for (name, count) in rows {
            let _ = writeln!(out, "{:<8}{:>7}", name, count);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Status: {}", self.status);
        let _ = writeln!(out);

        for entry in &self.entries {
            let _ = writeln!(
                out,
                "{}. {}: {}",
                entry.recorded.position(),
                entry.case.id,
                entry.recorded.outcome
            );
        }
        out
    }

    /// Detailed report text, including diffs of failed tests.
    pub fn render_detailed(&self) -> String {
        let mut out = String::new();
        self.write_header(&mut out);

        for entry in &self.entries {
            let recorded = &entry.recorded;
            let _ = writeln!(out, "{}. {}", recorded.position(), entry.case.id);
            let _ = writeln!(out, "   Script:  {}", entry.case.script.display());
            let _ = writeln!(out, "   Outcome: {}", recorded.outcome);
            let _ = writeln!(out, "   Elapsed: {:.2}s", recorded.elapsed.as_secs_f64());
            if let Some(detail) = &recorded.detail {
                let _ = writeln!(out, "   Detail:  {}", detail);
            }
            if recorded.outcome == Outcome::Failed {
                let _ = writeln!(out, "   Diff:    {}", entry.case.diff_path.display());
                if let Some(diff) = &entry.diff {
                    let _ = writeln!(out);
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(
            out,
            "{} total, {} passed, {} failed, {} new: {}",
            self.tally.total, self.tally.passed, self.tally.failed, self.tally.new, self.status
        );
        out
    }

    /// Machine-readable report.
    pub fn render_json(&self) -> Result<String, ReportError> {
        let report = JsonReport {
            timestamp: self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            run_id: self.run_id.to_string(),
            total: self.tally.total,
            passed: self.tally.passed,
            failed: self.tally.failed,
            new: self.tally.new,
            status: self.status,
            success_rate: self.tally.success_rate(),
            tests: self
                .entries
                .iter()
                .map(|entry| JsonTest {
                    seq: entry.recorded.position(),
                    id: &entry.case.id,
                    script: &entry.case.script,
                    outcome: entry.recorded.outcome,
                    elapsed_secs: entry.recorded.elapsed.as_secs_f64(),
                    detail: entry.recorded.detail.as_deref(),
                    diff_file: (entry.recorded.outcome == Outcome::Failed)
                        .then_some(entry.case.diff_path.as_path()),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write all three report files into `reports_dir`, creating it if needed.
    pub fn write(&self, reports_dir: &Path) -> Result<ReportPaths, ReportError> {
        std::fs::create_dir_all(reports_dir).map_err(|source| ReportError::Io {
            path: reports_dir.to_path_buf(),
            source,
        })?;

        let stamp = self.file_stamp();
        let paths = ReportPaths {
            summary: reports_dir.join(format!("report_{stamp}.txt")),
            detailed: reports_dir.join(format!("detailed_report_{stamp}.txt")),
            json: reports_dir.join(format!("report_{stamp}.json")),
        };

        let json = self.render_json()?;
        write_atomic(&paths.detailed, self.render_detailed().as_bytes())?;
        write_atomic(&paths.json, json.as_bytes())?;
        write_atomic(&paths.summary, self.render_summary().as_bytes())?;

        tracing::info!(path = %paths.summary.display(), "wrote run report");
        Ok(paths)
    }
}

/// Write `content` to a temporary file beside `path`, then move it into place.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
