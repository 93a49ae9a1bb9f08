// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::test_helpers::{FakeClient, FakeResponse};
use std::fs;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    guard: TransientGuard,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("results")).unwrap();
        Self {
            dir,
            guard: TransientGuard::new(),
        }
    }

    fn case(&self, id: &str, body: &str) -> TestCase {
        let script = self.dir.path().join(format!("{id}.sql"));
        fs::write(&script, body).unwrap();
        TestCase::new(script, &self.dir.path().join("results")).unwrap()
    }
}

fn executor(client: FakeClient, timeout: Option<Duration>) -> Executor {
    Executor::new(Arc::new(client), timeout)
}

#[tokio::test]
async fn test_run_captures_output() {
    let fx = Fixture::new();
    let case = fx.case("orders", "A|B|C\n");
    let fresh = executor(FakeClient::new(), None)
        .run(&case, &fx.guard)
        .await
        .unwrap();

    assert_eq!(fresh.path, case.transient_path);
    assert_eq!(fresh.bytes, b"A|B|C\n");
    assert_eq!(fs::read(&case.transient_path).unwrap(), b"A|B|C\n");
    assert_eq!(fx.guard.pending(), vec![case.transient_path.clone()]);
}

#[tokio::test]
async fn test_run_empty_output() {
    let fx = Fixture::new();
    let case = fx.case("empty", "");
    let fresh = executor(FakeClient::new(), None)
        .run(&case, &fx.guard)
        .await
        .unwrap();
    assert!(fresh.bytes.is_empty());
    assert!(case.transient_path.exists());
}

#[tokio::test]
async fn test_nonzero_exit_removes_partial_output() {
    let fx = Fixture::new();
    let case = fx.case("broken", "");
    let client = FakeClient::new().respond("broken", FakeResponse::fail("Msg 208"));
    let err = executor(client, None)
        .run(&case, &fx.guard)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::NonZeroExit { code: Some(1) }));
    assert!(!case.transient_path.exists());
    assert!(fx.guard.pending().is_empty());
}

#[tokio::test]
async fn test_timeout_removes_partial_output() {
    let fx = Fixture::new();
    let case = fx.case("slow", "");
    let client = FakeClient::new().respond("slow", FakeResponse::Hang);
    let err = executor(client, Some(Duration::from_millis(50)))
        .run(&case, &fx.guard)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Timeout { .. }));
    assert_eq!(err.to_string(), "execution timed out after 50ms");
    assert!(!case.transient_path.exists());
    assert!(fx.guard.pending().is_empty());
}

#[tokio::test]
async fn test_spawn_error_is_client_error() {
    let fx = Fixture::new();
    let case = fx.case("orders", "");
    let client = FakeClient::new().respond("orders", FakeResponse::SpawnError);
    let err = executor(client, None)
        .run(&case, &fx.guard)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Client(ClientError::Spawn { .. })));
    assert!(!case.transient_path.exists());
}

#[tokio::test]
async fn test_missing_results_dir_is_output_error() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("orders.sql");
    fs::write(&script, "").unwrap();
    let case = TestCase::new(script, &dir.path().join("absent")).unwrap();
    let guard = TransientGuard::new();

    let err = executor(FakeClient::new(), None)
        .run(&case, &guard)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutionError::Output { .. }));
    assert!(guard.pending().is_empty());
}

#[test]
fn test_nonzero_exit_message() {
    assert_eq!(
        ExecutionError::NonZeroExit { code: Some(2) }.to_string(),
        "database client exited with status 2"
    );
    assert_eq!(
        ExecutionError::NonZeroExit { code: None }.to_string(),
        "database client exited with status unknown"
    );
}
