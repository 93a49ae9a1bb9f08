// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Comparison of fresh output against recorded baselines.
//!
//! Comparison is textual. Both sides go through the same [`Normalization`]
//! before they are compared or diffed; the formatting of the client output
//! itself (column delimiters, header rows) is left to the database client.

use crate::baseline::{BaselineError, BaselineStore};
use crate::case::TestCase;
use crate::executor::FreshOutput;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use sqlbaseline_capture::Outcome;
use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

/// Lines of unchanged context around each diff hunk.
pub const DIFF_CONTEXT_LINES: usize = 3;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Baseline(#[from] BaselineError),
}

/// How output is normalized before comparison.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Byte-for-byte comparison
    Exact,
    /// Carriage returns before line ends are dropped and trailing newlines
    /// collapse to a single one
    #[default]
    TrailingNewline,
    /// Every line trimmed and blank lines dropped
    Lenient,
}

impl Normalization {
    pub fn apply<'a>(self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            Normalization::Exact => Cow::Borrowed(bytes),
            Normalization::TrailingNewline => {
                let mut lines: Vec<&[u8]> = bytes
                    .split(|&b| b == b'\n')
                    .map(|mut line| {
                        while let [rest @ .., b'\r'] = line {
                            line = rest;
                        }
                        line
                    })
                    .collect();
                while lines.last().is_some_and(|l| l.is_empty()) {
                    lines.pop();
                }
                let mut out = Vec::with_capacity(bytes.len() + 1);
                for line in lines {
                    out.extend_from_slice(line);
                    out.push(b'\n');
                }
                Cow::Owned(out)
            }
            Normalization::Lenient => {
                let text = String::from_utf8_lossy(bytes);
                let mut out = String::with_capacity(text.len());
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    out.push_str(line);
                    out.push('\n');
                }
                Cow::Owned(out.into_bytes())
            }
        }
    }
}

/// Render a unified diff with the baseline as "before" and fresh output as "after".
pub fn unified_diff(id: &str, baseline: &str, fresh: &str) -> String {
    TextDiff::from_lines(baseline, fresh)
        .unified_diff()
        .context_radius(DIFF_CONTEXT_LINES)
        .header(
            &format!("a/{}.result", id),
            &format!("b/{}_new.result", id),
        )
        .to_string()
}

/// Count of removed plus inserted lines between two texts.
pub fn changed_lines(baseline: &str, fresh: &str) -> usize {
    TextDiff::from_lines(baseline, fresh)
        .iter_all_changes()
        .filter(|c| c.tag() != ChangeTag::Equal)
        .count()
}

/// Result of classifying one fresh output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub outcome: Outcome,
    /// Diff artifact written for a `Failed` outcome
    pub diff_path: Option<PathBuf>,
    /// Diff text for a `Failed` outcome
    pub diff: Option<String>,
    pub changed_lines: usize,
}

impl Classification {
    fn new_baseline() -> Self {
        Self {
            outcome: Outcome::New,
            diff_path: None,
            diff: None,
            changed_lines: 0,
        }
    }

    fn passed() -> Self {
        Self {
            outcome: Outcome::Passed,
            diff_path: None,
            diff: None,
            changed_lines: 0,
        }
    }

    /// Short note for reports.
    pub fn detail(&self) -> Option<String> {
        match self.outcome {
            Outcome::New => Some("baseline recorded".to_string()),
            Outcome::Failed => Some(match self.changed_lines {
                1 => "1 line changed".to_string(),
                n => format!("{} lines changed", n),
            }),
            Outcome::Passed | Outcome::ExecutionError => None,
        }
    }
}

/// Classifies fresh output and applies the matching artifact transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct Comparator {
    normalization: Normalization,
}

impl Comparator {
    pub fn new(normalization: Normalization) -> Self {
        Self { normalization }
    }

    /// Classify `fresh` against the baseline for `case`.
    ///
    /// - no baseline: the fresh artifact is promoted and the outcome is `New`
    /// - equal: the fresh artifact and any stale diff are removed, `Passed`
    /// - different: a diff is written and the fresh artifact kept, `Failed`
    pub fn classify(
        &self,
        case: &TestCase,
        fresh: &FreshOutput,
        store: &BaselineStore,
    ) -> Result<Classification, CompareError> {
        let baseline = match store.read(&case.id) {
            Ok(bytes) => bytes,
            Err(BaselineError::NotFound(_)) => {
                store.remove_diff(&case.id)?;
                store.promote(&fresh.path, &case.id)?;
                return Ok(Classification::new_baseline());
            }
            Err(e) => return Err(e.into()),
        };

        let expected = self.normalization.apply(&baseline);
        let actual = self.normalization.apply(&fresh.bytes);
        if expected == actual {
            store.remove_transient(&case.id)?;
            store.remove_diff(&case.id)?;
            return Ok(Classification::passed());
        }

        let (expected, actual) = diff_text(&expected, &actual);
        let diff = unified_diff(&case.id, &expected, &actual);
        let diff_path = store.write_diff(&case.id, &diff)?;
        Ok(Classification {
            outcome: Outcome::Failed,
            diff_path: Some(diff_path),
            changed_lines: changed_lines(&expected, &actual),
            diff: Some(diff),
        })
    }
}

/// Text for diffing two normalized outputs.
///
/// When either side is not UTF-8, both are rendered with `escape_ascii`
/// line by line, so differing invalid bytes still show up as changed lines.
fn diff_text(expected: &[u8], actual: &[u8]) -> (String, String) {
    match (std::str::from_utf8(expected), std::str::from_utf8(actual)) {
        (Ok(e), Ok(a)) => (e.to_string(), a.to_string()),
        _ => (escape_lines(expected), escape_lines(actual)),
    }
}

fn escape_lines(bytes: &[u8]) -> String {
    bytes
        .split_inclusive(|&b| b == b'\n')
        .map(|line| {
            let (body, newline) = match line.strip_suffix(b"\n") {
                Some(body) => (body, "\n"),
                None => (line, ""),
            };
            format!("{}{newline}", body.escape_ascii())
        })
        .collect()
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
