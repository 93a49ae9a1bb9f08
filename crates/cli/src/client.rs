// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Database client invocation.

use crate::config::{ClientFormat, ConnectionConfig, HarnessConfig};
use crate::env;
use std::ffi::OsString;
use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Exit status reported by a client invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl ClientStatus {
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failure(code: Option<i32>) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("database client '{0}' not found")]
    NotFound(PathBuf),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("client I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClientFuture<'a> = Pin<Box<dyn Future<Output = Result<ClientStatus, ClientError>> + Send + 'a>>;

/// Runs one script against the database.
///
/// Implementations write the combined stdout/stderr of the run into `sink`
/// and report whether the client considered the run successful. Dropping the
/// returned future must stop the invocation.
pub trait QueryClient: Send + Sync {
    fn execute<'a>(&'a self, script: &'a Path, sink: File) -> ClientFuture<'a>;

    /// Check that the client can be invoked at all.
    fn available(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// `sqlcmd`-compatible command line client.
#[derive(Clone)]
pub struct SqlcmdClient {
    program: PathBuf,
    connection: ConnectionConfig,
    format: ClientFormat,
}

impl SqlcmdClient {
    pub fn new(program: impl Into<PathBuf>, connection: ConnectionConfig, format: ClientFormat) -> Self {
        Self {
            program: program.into(),
            connection,
            format,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.client.clone(),
            config.connection.clone(),
            config.format.clone(),
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for running `script`, in invocation order.
    pub fn build_args(&self, script: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push_opt = |flag: &str, value: &Option<String>| {
            if let Some(value) = value {
                args.push(flag.into());
                args.push(value.into());
            }
        };
        push_opt("-S", &self.connection.server);
        push_opt("-d", &self.connection.database);
        push_opt("-U", &self.connection.user);
        push_opt("-P", &self.connection.password);

        args.push("-i".into());
        args.push(script.as_os_str().to_owned());
        args.push("-s".into());
        args.push(self.format.delimiter.as_str().into());
        if self.format.trim_whitespace {
            args.push("-W".into());
        }
        if !self.format.headers {
            args.push("-h".into());
            args.push("-1".into());
        }
        // Abort on error so a failing batch shows up in the exit status
        args.push("-b".into());
        args.extend(self.format.extra_args.iter().map(OsString::from));
        args
    }

    /// Command line for logs, with the password masked.
    pub fn display_command(&self, script: &Path) -> String {
        let mut parts = vec![self.program.display().to_string()];
        let mut mask_next = false;
        for arg in self.build_args(script) {
            let arg = arg.to_string_lossy().into_owned();
            if mask_next {
                parts.push("****".to_string());
                mask_next = false;
            } else {
                mask_next = arg == "-P";
                parts.push(arg);
            }
        }
        parts.join(" ")
    }
}

impl std::fmt::Debug for SqlcmdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlcmdClient")
            .field("program", &self.program)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl QueryClient for SqlcmdClient {
    fn execute<'a>(&'a self, script: &'a Path, sink: File) -> ClientFuture<'a> {
        Box::pin(async move {
            let stderr = sink.try_clone()?;
            tracing::debug!(command = %self.display_command(script), "invoking database client");

            let mut child = Command::new(&self.program)
                .args(self.build_args(script))
                .stdin(Stdio::null())
                .stdout(Stdio::from(sink))
                .stderr(Stdio::from(stderr))
                .kill_on_drop(true) // Timeout or interrupt drops the future and kills the client
                .spawn()
                .map_err(|source| ClientError::Spawn {
                    program: self.program.clone(),
                    source,
                })?;

            let status = child.wait().await?;
            Ok(if status.success() {
                ClientStatus::success()
            } else {
                ClientStatus::failure(status.code())
            })
        })
    }

    fn available(&self) -> Result<(), ClientError> {
        if resolve_program(&self.program).is_some() {
            Ok(())
        } else {
            Err(ClientError::NotFound(self.program.clone()))
        }
    }
}

/// Locate an executable: paths with a directory component are checked as-is,
/// bare names are searched on `PATH`.
pub fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let search = env::search_path()?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
