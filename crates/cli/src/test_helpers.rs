// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixtures for unit tests.

use crate::client::{ClientError, ClientFuture, ClientStatus, QueryClient};
use crate::interrupt::Interrupt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Scripted behavior of a [`FakeClient`] for one script.
#[derive(Clone, Debug)]
pub enum FakeResponse {
    /// Write `text` and exit with the given success flag
    Output { text: String, success: bool },
    /// Never finish
    Hang,
    /// Trigger the interrupt, then never finish
    Interrupt(Interrupt),
    /// Fail to start
    SpawnError,
}

impl FakeResponse {
    pub fn ok(text: &str) -> Self {
        Self::Output {
            text: text.to_string(),
            success: true,
        }
    }

    pub fn fail(text: &str) -> Self {
        Self::Output {
            text: text.to_string(),
            success: false,
        }
    }
}

/// In-process query client.
///
/// Scripts without a scripted response echo their own contents, so a test
/// controls the "query output" by writing the script file.
#[derive(Debug)]
pub struct FakeClient {
    responses: Mutex<HashMap<String, FakeResponse>>,
    calls: Mutex<Vec<PathBuf>>,
    available: bool,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            available: true,
        }
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Script a response for the script whose file stem is `id`.
    pub fn respond(self, id: &str, response: FakeResponse) -> Self {
        self.responses.lock().insert(id.to_string(), response);
        self
    }

    /// Scripts executed so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().clone()
    }

    fn response_for(&self, script: &Path) -> Option<FakeResponse> {
        let id = script.file_stem()?.to_string_lossy().into_owned();
        self.responses.lock().get(&id).cloned()
    }
}

impl QueryClient for FakeClient {
    fn execute<'a>(&'a self, script: &'a Path, mut sink: File) -> ClientFuture<'a> {
        Box::pin(async move {
            self.calls.lock().push(script.to_path_buf());
            match self.response_for(script) {
                None => {
                    let text = std::fs::read(script)?;
                    sink.write_all(&text)?;
                    Ok(ClientStatus::success())
                }
                Some(FakeResponse::Output { text, success }) => {
                    sink.write_all(text.as_bytes())?;
                    Ok(if success {
                        ClientStatus::success()
                    } else {
                        ClientStatus::failure(Some(1))
                    })
                }
                Some(FakeResponse::Hang) => {
                    sink.write_all(b"partial")?;
                    std::future::pending().await
                }
                Some(FakeResponse::Interrupt(interrupt)) => {
                    sink.write_all(b"partial")?;
                    interrupt.trigger();
                    std::future::pending().await
                }
                Some(FakeResponse::SpawnError) => Err(ClientError::Spawn {
                    program: PathBuf::from("fake-client"),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
                }),
            }
        })
    }

    fn available(&self) -> Result<(), ClientError> {
        if self.available {
            Ok(())
        } else {
            Err(ClientError::NotFound(PathBuf::from("fake-client")))
        }
    }
}

/// Write an executable shell script standing in for `sqlcmd`.
///
/// It prints the script given with `-i`, minus comment lines. A script
/// containing a `-- fail` line makes it exit 1 after writing to stderr; a
/// `-- hang` line makes it sleep.
#[cfg(unix)]
pub fn write_fake_client(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-sqlcmd");
    std::fs::write(&path, FAKE_CLIENT_SCRIPT).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
const FAKE_CLIENT_SCRIPT: &str = r#"#!/bin/sh
script=""
while [ $# -gt 0 ]; do
    case "$1" in
        -i) script="$2"; shift 2 ;;
        *) shift ;;
    esac
done
if grep -q '^-- fail' "$script"; then
    echo "Msg 208, Level 16: Invalid object name" >&2
    exit 1
fi
if grep -q '^-- hang' "$script"; then
    exec sleep 30
fi
grep -v '^--' "$script"
exit 0
"#;
