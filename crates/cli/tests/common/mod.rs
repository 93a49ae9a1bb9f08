// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for end-to-end tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for `sqlcmd`: prints the `-i` script minus comment lines.
/// `-- fail` makes it exit 1; `-- hang` makes it sleep.
const FAKE_CLIENT: &str = r#"#!/bin/sh
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

/// A scratch project: scripts at the root, results and reports beneath it.
pub struct Project {
    pub dir: TempDir,
    pub client: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let client = dir.path().join("fake-sqlcmd");
        fs::write(&client, FAKE_CLIENT).unwrap();
        fs::set_permissions(&client, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, client }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn script(&self, id: &str, body: &str) -> &Self {
        fs::write(self.path().join(format!("{id}.sql")), body).unwrap();
        self
    }

    pub fn result(&self, name: &str) -> PathBuf {
        self.path().join("results").join(name)
    }

    pub fn read_result(&self, name: &str) -> String {
        fs::read_to_string(self.result(name)).unwrap()
    }

    /// Report files written so far, sorted by name.
    pub fn reports(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.path().join("reports")) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
        paths.sort();
        paths
    }

    /// The binary, run inside the project with the fake client.
    pub fn command(&self) -> Command {
        self.command_with_client(&self.client)
    }

    pub fn command_with_client(&self, client: &Path) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sqlbaseline"));
        cmd.current_dir(self.path())
            .arg("--client")
            .arg(client)
            .env_remove("SQLBASELINE_SERVER")
            .env_remove("SQLBASELINE_USER")
            .env_remove("SQLBASELINE_PASSWORD")
            .env_remove("SQLBASELINE_DATABASE")
            .env_remove("SQLBASELINE_CONFIG")
            .env_remove("SQLBASELINE_CLIENT")
            .env_remove("SQLBASELINE_TIMEOUT_SECS")
            .env_remove("SQLBASELINE_LOG");
        cmd
    }
}
