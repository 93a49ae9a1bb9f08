// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Script execution into transient result artifacts.

use crate::baseline::remove_if_present;
use crate::case::TestCase;
use crate::client::{ClientError, QueryClient};
use crate::guard::TransientGuard;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Captured output of a successful execution.
#[derive(Clone, Debug)]
pub struct FreshOutput {
    /// The `<id>_new.result` artifact holding the output
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("cannot write result file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database client exited with status {}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    NonZeroExit { code: Option<i32> },

    #[error("execution timed out after {after:?}")]
    Timeout { after: Duration },
}

/// Runs test scripts through a [`QueryClient`].
#[derive(Clone)]
pub struct Executor {
    client: Arc<dyn QueryClient>,
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new(client: Arc<dyn QueryClient>, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }

    /// Execute `case`, capturing output into its transient artifact.
    ///
    /// The artifact is registered with `guard` before the client starts. On
    /// any failure the partial artifact is deleted and released again, so a
    /// failed execution never leaves a misleading result file behind.
    pub async fn run(
        &self,
        case: &TestCase,
        guard: &TransientGuard,
    ) -> Result<FreshOutput, ExecutionError> {
        let start = Instant::now();
        let path = case.transient_path.clone();
        let sink = File::create(&path).map_err(|source| ExecutionError::Output {
            path: path.clone(),
            source,
        })?;
        guard.register(&path);

        let result = self.invoke(case, sink).await;
        let result = match result {
            Ok(()) => tokio::fs::read(&path)
                .await
                .map_err(|source| ExecutionError::Output {
                    path: path.clone(),
                    source,
                }),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => Ok(FreshOutput {
                path,
                bytes,
                elapsed: start.elapsed(),
            }),
            Err(e) => {
                if let Err(cleanup) = remove_if_present(&path) {
                    tracing::warn!(id = %case.id, error = %cleanup, "failed to remove partial output");
                } else {
                    guard.release(&path);
                }
                Err(e)
            }
        }
    }

    async fn invoke(&self, case: &TestCase, sink: File) -> Result<(), ExecutionError> {
        let call = self.client.execute(&case.script, sink);
        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(status) => status?,
                Err(_) => {
                    return Err(ExecutionError::Timeout { after: limit })
                }
            },
            None => call.await?,
        };

        if status.success {
            Ok(())
        } else {
            Err(ExecutionError::NonZeroExit { code: status.code })
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
