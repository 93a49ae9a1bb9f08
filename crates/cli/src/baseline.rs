// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Baseline store and results-directory layout.
//!
//! A results directory holds three artifacts per test id:
//!
//! - `<id>.result`: the recorded baseline
//! - `<id>_new.result`: fresh output from the current run (transient)
//! - `<id>.diff`: unified diff from the last failing comparison
//!
//! The store only ever creates a baseline that did not exist. Replacing an
//! existing baseline after a regression is left to the operator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("no baseline recorded for '{0}'")]
    NotFound(String),

    #[error("baseline for '{0}' already exists")]
    AlreadyExists(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BaselineError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// Free functions for path computation

pub fn baseline_path(results_dir: &Path, id: &str) -> PathBuf {
    results_dir.join(format!("{}.result", id))
}

pub fn transient_path(results_dir: &Path, id: &str) -> PathBuf {
    results_dir.join(format!("{}_new.result", id))
}

pub fn diff_path(results_dir: &Path, id: &str) -> PathBuf {
    results_dir.join(format!("{}.diff", id))
}

/// Baselines keyed by test id, stored as files in the results directory.
#[derive(Clone, Debug)]
pub struct BaselineStore {
    results_dir: PathBuf,
}

impl BaselineStore {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Create the results directory if needed.
    pub fn ensure_dir(&self) -> Result<(), BaselineError> {
        fs::create_dir_all(&self.results_dir).map_err(|e| BaselineError::io(&self.results_dir, e))
    }

    pub fn exists(&self, id: &str) -> bool {
        baseline_path(&self.results_dir, id).is_file()
    }

    /// Read the recorded baseline for `id`.
    pub fn read(&self, id: &str) -> Result<Vec<u8>, BaselineError> {
        let path = baseline_path(&self.results_dir, id);
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BaselineError::NotFound(id.to_string()),
            _ => BaselineError::io(&path, e),
        })
    }

    /// Make `fresh` the baseline for `id` by renaming it into place.
    ///
    /// The fresh artifact no longer exists afterwards. Fails if a baseline is
    /// already recorded.
    pub fn promote(&self, fresh: &Path, id: &str) -> Result<PathBuf, BaselineError> {
        let target = baseline_path(&self.results_dir, id);
        if target.exists() {
            return Err(BaselineError::AlreadyExists(id.to_string()));
        }
        fs::rename(fresh, &target).map_err(|e| BaselineError::io(fresh, e))?;
        tracing::debug!(id, path = %target.display(), "promoted baseline");
        Ok(target)
    }

    /// Persist a diff for `id`, replacing any earlier one.
    pub fn write_diff(&self, id: &str, diff: &str) -> Result<PathBuf, BaselineError> {
        let path = diff_path(&self.results_dir, id);
        fs::write(&path, diff).map_err(|e| BaselineError::io(&path, e))?;
        Ok(path)
    }

    /// Remove the diff for `id`. Returns whether one existed.
    pub fn remove_diff(&self, id: &str) -> Result<bool, BaselineError> {
        remove_if_present(&diff_path(&self.results_dir, id))
    }

    /// Remove the transient fresh output for `id`. Returns whether one existed.
    pub fn remove_transient(&self, id: &str) -> Result<bool, BaselineError> {
        remove_if_present(&transient_path(&self.results_dir, id))
    }
}

/// Delete a file, treating "already gone" as success.
pub(crate) fn remove_if_present(path: &Path) -> Result<bool, BaselineError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BaselineError::io(path, e)),
    }
}

#[cfg(test)]
#[path = "baseline_tests.rs"]
mod tests;
