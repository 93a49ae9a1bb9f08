// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line argument parsing.

use crate::compare::Normalization;
use clap::Parser;
use std::path::PathBuf;

/// Run query scripts and compare their output against recorded baselines
#[derive(Parser, Clone, Debug, Default)]
#[command(name = "sqlbaseline", version, about)]
pub struct Cli {
    /// Config file (default: ./sqlbaseline.toml when present)
    #[arg(long, env = "SQLBASELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database server address
    #[arg(short = 'S', long, env = "SQLBASELINE_SERVER")]
    pub server: Option<String>,

    /// Database login
    #[arg(short = 'U', long, env = "SQLBASELINE_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(short = 'P', long, env = "SQLBASELINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name
    #[arg(short = 'd', long, env = "SQLBASELINE_DATABASE")]
    pub database: Option<String>,

    /// Directory holding baselines, fresh output, and diffs
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Directory receiving run reports
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,

    /// Directory searched for scripts
    #[arg(long)]
    pub scripts_dir: Option<PathBuf>,

    /// Glob pattern selecting scripts within the scripts directory
    #[arg(long)]
    pub pattern: Option<String>,

    /// Database client executable
    #[arg(long, env = "SQLBASELINE_CLIENT")]
    pub client: Option<PathBuf>,

    /// Per-script timeout in seconds (0 disables)
    #[arg(long, env = "SQLBASELINE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Output normalization applied before comparison
    #[arg(long, value_enum)]
    pub normalize: Option<Normalization>,

    /// Number of scripts executed concurrently
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Exit with status 2 when any test failed
    #[arg(long)]
    pub fail_on_regression: bool,

    /// Stream outcome records as JSON lines to this file
    #[arg(long)]
    pub transcript: Option<PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
