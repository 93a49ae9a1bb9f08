// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness configuration.
//!
//! Settings are layered: the TOML config file first, then environment
//! variables and command-line flags (both resolved by clap, flags winning).

use crate::cli::Cli;
use crate::compare::Normalization;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file loaded from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "sqlbaseline.toml";
/// Default database client executable
pub const DEFAULT_CLIENT: &str = "sqlcmd";
/// Default per-script timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Default script selection pattern
pub const DEFAULT_PATTERN: &str = "*.sql";
/// Default column delimiter passed to the client
pub const DEFAULT_DELIMITER: &str = "|";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_REPORTS_DIR: &str = "reports";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of a `sqlbaseline.toml` file. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
    #[serde(default)]
    pub reports_dir: Option<PathBuf>,
    #[serde(default)]
    pub scripts_dir: Option<PathBuf>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub client: Option<PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub headers: Option<bool>,
    #[serde(default)]
    pub trim_whitespace: Option<bool>,
    /// Extra arguments appended to every client invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub normalize: Option<Normalization>,
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub fail_on_regression: Option<bool>,
}

impl FileConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the explicit config path, or the default file if it exists.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = cwd.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Connection parameters passed through to the database client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("database", &self.database)
            .finish()
    }
}

/// Output formatting options passed through to the database client unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientFormat {
    pub delimiter: String,
    pub headers: bool,
    pub trim_whitespace: bool,
    pub extra_args: Vec<String>,
}

impl Default for ClientFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            headers: true,
            trim_whitespace: true,
            extra_args: Vec::new(),
        }
    }
}

/// Fully resolved harness configuration.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub connection: ConnectionConfig,
    pub format: ClientFormat,
    pub scripts_dir: PathBuf,
    pub pattern: String,
    pub results_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub client: PathBuf,
    /// `None` disables the timeout
    pub timeout: Option<Duration>,
    pub normalize: Normalization,
    pub jobs: usize,
    pub fail_on_regression: bool,
    pub transcript: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            format: ClientFormat::default(),
            scripts_dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            client: PathBuf::from(DEFAULT_CLIENT),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            normalize: Normalization::default(),
            jobs: 1,
            fail_on_regression: false,
            transcript: None,
        }
    }
}

impl HarnessConfig {
    /// Defaults with scripts, results, and reports rooted at `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            scripts_dir: root.to_path_buf(),
            results_dir: root.join(DEFAULT_RESULTS_DIR),
            reports_dir: root.join(DEFAULT_REPORTS_DIR),
            ..Self::default()
        }
    }

    /// Resolve configuration from the command line and any config file.
    pub fn resolve(cli: &Cli, cwd: &Path) -> Result<Self, ConfigError> {
        let file = FileConfig::discover(cli.config.as_deref(), cwd)?;
        Self::merge(file, cli)
    }

    /// Layer command-line values over file values over defaults.
    pub fn merge(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            connection: ConnectionConfig {
                server: cli.server.clone().or(file.server),
                user: cli.user.clone().or(file.user),
                password: cli.password.clone().or(file.password),
                database: cli.database.clone().or(file.database),
            },
            format: ClientFormat {
                delimiter: file.delimiter.unwrap_or(defaults.format.delimiter),
                headers: file.headers.unwrap_or(defaults.format.headers),
                trim_whitespace: file
                    .trim_whitespace
                    .unwrap_or(defaults.format.trim_whitespace),
                extra_args: file.extra_args,
            },
            scripts_dir: cli
                .scripts_dir
                .clone()
                .or(file.scripts_dir)
                .unwrap_or(defaults.scripts_dir),
            pattern: cli.pattern.clone().or(file.pattern).unwrap_or(defaults.pattern),
            results_dir: cli
                .results_dir
                .clone()
                .or(file.results_dir)
                .unwrap_or(defaults.results_dir),
            reports_dir: cli
                .reports_dir
                .clone()
                .or(file.reports_dir)
                .unwrap_or(defaults.reports_dir),
            client: cli.client.clone().or(file.client).unwrap_or(defaults.client),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            normalize: cli.normalize.or(file.normalize).unwrap_or_default(),
            jobs: cli.jobs.or(file.jobs).unwrap_or(defaults.jobs),
            fail_on_regression: cli.fail_on_regression || file.fail_on_regression.unwrap_or(false),
            transcript: cli.transcript.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::Invalid("script pattern is empty".to_string()));
        }
        if self.format.delimiter.is_empty() {
            return Err(ConfigError::Invalid("column delimiter is empty".to_string()));
        }
        if self.results_dir == self.reports_dir {
            return Err(ConfigError::Invalid(format!(
                "results and reports share the directory {}",
                self.results_dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
