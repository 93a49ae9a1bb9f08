// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation driven by SIGINT/SIGTERM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Shared interrupt flag.
///
/// Signal handlers only set the flag; the run controller observes it between
/// and during test executions.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a flag that is only set via [`Interrupt::trigger`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag set by SIGINT or SIGTERM.
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use signal_hook::consts::{SIGINT, SIGTERM};

        let interrupt = Self::new();
        signal_hook::flag::register(SIGINT, Arc::clone(&interrupt.flag))?;
        signal_hook::flag::register(SIGTERM, Arc::clone(&interrupt.flag))?;
        Ok(interrupt)
    }

    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self::new())
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the flag is set.
    pub async fn triggered(&self) {
        while !self.is_triggered() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
