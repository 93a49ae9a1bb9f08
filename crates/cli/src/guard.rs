// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped tracking of transient fresh-output artifacts.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Tracks `<id>_new.result` files that have not been finalized yet.
///
/// Artifacts are registered before the client writes to them and released
/// once they are promoted, retained beside a diff, or deleted. Whatever is
/// still registered when the guard is cleaned up or dropped is removed, so
/// an aborted run never leaves orphaned fresh output behind.
#[derive(Debug, Default)]
pub struct TransientGuard {
    pending: Mutex<BTreeSet<PathBuf>>,
}

impl TransientGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an artifact.
    pub fn register(&self, path: &Path) {
        self.pending.lock().insert(path.to_path_buf());
    }

    /// Stop tracking an artifact. Returns whether it was tracked.
    pub fn release(&self, path: &Path) -> bool {
        self.pending.lock().remove(path)
    }

    /// Artifacts currently tracked, in path order.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> Vec<PathBuf> {
        self.pending.lock().iter().cloned().collect()
    }

    /// Delete every tracked artifact. Returns how many files were removed.
    pub fn cleanup(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock());
        let mut removed = 0;
        for path in pending {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    removed += 1;
                    tracing::debug!(path = %path.display(), "removed transient artifact");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove transient artifact");
                }
            }
        }
        removed
    }
}

impl Drop for TransientGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
