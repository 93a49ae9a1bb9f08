// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test case identity and script discovery.

use crate::baseline::{baseline_path, diff_path, transient_path};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid script pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script name has no usable base name: {0}")]
    InvalidName(PathBuf),

    #[error("scripts {first} and {second} share the test id '{id}'")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One discovered script and its derived artifact paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// Base name of the script (file name without extension)
    pub id: String,
    pub script: PathBuf,
    /// Where this run's fresh output is captured
    pub transient_path: PathBuf,
    pub baseline_path: PathBuf,
    pub diff_path: PathBuf,
}

impl TestCase {
    /// Derive a test case from a script path.
    pub fn new(script: impl Into<PathBuf>, results_dir: &Path) -> Result<Self, DiscoveryError> {
        let script = script.into();
        let id = script
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DiscoveryError::InvalidName(script.clone()))?
            .to_string();

        Ok(Self {
            transient_path: transient_path(results_dir, &id),
            baseline_path: baseline_path(results_dir, &id),
            diff_path: diff_path(results_dir, &id),
            id,
            script,
        })
    }
}

/// Find scripts matching `pattern` under `scripts_dir`, in path order.
///
/// Only regular files are returned. Two scripts mapping to the same id (for
/// example `a/q.sql` and `b/q.sql` under a recursive pattern) are rejected,
/// since their artifacts would collide.
pub fn discover(
    scripts_dir: &Path,
    pattern: &str,
    results_dir: &Path,
) -> Result<Vec<TestCase>, DiscoveryError> {
    let full_pattern = scripts_dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let entries = glob::glob(&full_pattern).map_err(|source| DiscoveryError::Pattern {
        pattern: full_pattern.to_string(),
        source,
    })?;

    let mut scripts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DiscoveryError::Io {
            path: e.path().to_path_buf(),
            source: std::io::Error::from(e),
        })?;
        if path.is_file() {
            scripts.push(path);
        }
    }
    scripts.sort();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut cases = Vec::with_capacity(scripts.len());
    for script in scripts {
        let case = TestCase::new(script, results_dir)?;
        if let Some(first) = seen.get(&case.id) {
            return Err(DiscoveryError::DuplicateId {
                id: case.id,
                first: first.clone(),
                second: case.script,
            });
        }
        seen.insert(case.id.clone(), case.script.clone());
        cases.push(case);
    }

    tracing::debug!(count = cases.len(), pattern = %full_pattern, "discovered scripts");
    Ok(cases)
}

#[cfg(test)]
#[path = "case_tests.rs"]
mod tests;
