// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Runtime environment variables read outside of clap are defined here;
//! variables bound to flags (`SQLBASELINE_CONFIG`, `SQLBASELINE_SERVER`, ...)
//! are declared on the clap arguments instead.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::ffi::OsString;

/// Tracing filter used when `SQLBASELINE_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// `SQLBASELINE_LOG` — tracing filter directive (e.g. `debug`, `sqlbaseline=trace`).
pub fn log_filter() -> Option<String> {
    std::env::var(names::SQLBASELINE_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// `PATH` — executable search path, used to locate the database client.
pub fn search_path() -> Option<OsString> {
    std::env::var_os(names::PATH)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
