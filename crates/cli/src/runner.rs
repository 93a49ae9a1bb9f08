// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run controller.
//!
//! Drives every discovered test case through
//! `Discovered -> Executed -> Classified -> Finalized` (or straight from
//! `Discovered` to `Finalized` when execution fails), records outcomes in
//! discovery order, and writes the run report on normal completion.

use crate::baseline::{remove_if_present, BaselineStore};
use crate::case::{discover, TestCase};
use crate::client::QueryClient;
use crate::compare::Comparator;
use crate::config::HarnessConfig;
use crate::executor::Executor;
use crate::guard::TransientGuard;
use crate::interrupt::Interrupt;
use crate::output;
use crate::report::{ReportEntry, ReportError, ReportPaths, RunReport};
use crate::time::{Clock, ClockHandle};
use chrono::{DateTime, Utc};
use sqlbaseline_capture::{Outcome, OutcomeEntry, OutcomeLog, OverallStatus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run completed.
pub const EXIT_OK: i32 = 0;
/// Configuration error or I/O failure.
pub const EXIT_ERROR: i32 = 1;
/// Run completed with failures and `fail_on_regression` set.
pub const EXIT_REGRESSION: i32 = 2;
/// Interrupted by a signal.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Processing state of a single test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseState {
    Discovered,
    Executed,
    Classified,
    Finalized,
}

impl CaseState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_advance_to(self, next: CaseState) -> bool {
        use CaseState::*;
        matches!(
            (self, next),
            (Discovered, Executed)
                | (Discovered, Finalized)
                | (Executed, Classified)
                | (Classified, Finalized)
        )
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("run interrupted")]
    Interrupted,

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker task failed: {0}")]
    Worker(String),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_ERROR,
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub report: RunReport,
    pub paths: ReportPaths,
}

impl RunSummary {
    pub fn status(&self) -> OverallStatus {
        self.report.status
    }

    pub fn exit_code(&self, fail_on_regression: bool) -> i32 {
        if fail_on_regression && self.report.status == OverallStatus::FailuresPresent {
            EXIT_REGRESSION
        } else {
            EXIT_OK
        }
    }
}

/// Finalized result of one test case.
#[derive(Debug)]
struct CaseResult {
    outcome: Outcome,
    elapsed: Duration,
    detail: Option<String>,
    diff: Option<String>,
    state: CaseState,
}

/// Per-case pipeline shared by sequential and parallel runs.
#[derive(Clone)]
struct CaseWorker {
    executor: Executor,
    comparator: Comparator,
    store: BaselineStore,
    guard: Arc<TransientGuard>,
}

impl CaseWorker {
    async fn process(&self, case: &TestCase) -> CaseResult {
        let start = Instant::now();
        let mut state = CaseState::Discovered;

        let fresh = match self.executor.run(case, &self.guard).await {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!(id = %case.id, error = %e, "execution failed");
                self.discard_diff(case);
                advance(&case.id, &mut state, CaseState::Finalized);
                return CaseResult {
                    outcome: Outcome::ExecutionError,
                    elapsed: start.elapsed(),
                    detail: Some(e.to_string()),
                    diff: None,
                    state,
                };
            }
        };
        advance(&case.id, &mut state, CaseState::Executed);

        let mut result = match self.comparator.classify(case, &fresh, &self.store) {
            Ok(classification) => CaseResult {
                outcome: classification.outcome,
                elapsed: fresh.elapsed,
                detail: classification.detail(),
                diff: classification.diff,
                state,
            },
            Err(e) => {
                tracing::warn!(id = %case.id, error = %e, "comparison failed");
                if let Err(cleanup) = remove_if_present(&fresh.path) {
                    tracing::warn!(id = %case.id, error = %cleanup, "failed to remove fresh output");
                }
                self.discard_diff(case);
                CaseResult {
                    outcome: Outcome::ExecutionError,
                    elapsed: fresh.elapsed,
                    detail: Some(format!("comparison failed: {e}")),
                    diff: None,
                    state,
                }
            }
        };
        advance(&case.id, &mut result.state, CaseState::Classified);

        // Promoted, deleted, or retained beside a diff: no longer transient
        self.guard.release(&fresh.path);
        advance(&case.id, &mut result.state, CaseState::Finalized);
        result
    }

    /// A diff only ever describes a `Failed` outcome of the current run.
    fn discard_diff(&self, case: &TestCase) {
        if let Err(e) = self.store.remove_diff(&case.id) {
            tracing::warn!(id = %case.id, error = %e, "failed to remove stale diff");
        }
    }
}

fn advance(id: &str, state: &mut CaseState, next: CaseState) {
    debug_assert!(
        state.can_advance_to(next),
        "illegal transition {:?} -> {:?}",
        state,
        next
    );
    tracing::trace!(id, from = ?state, to = ?next, "case state");
    *state = next;
}

/// Records finalized cases in discovery order and streams progress.
///
/// The outcome log is the single record of what happened; diff texts are
/// kept beside it, indexed by sequence number, for the detailed report.
struct Recorder<'a> {
    cases: &'a [TestCase],
    log: OutcomeLog,
    diffs: Vec<Option<String>>,
}

impl<'a> Recorder<'a> {
    fn new(cases: &'a [TestCase], log: OutcomeLog) -> Self {
        Self {
            cases,
            log,
            diffs: Vec::with_capacity(cases.len()),
        }
    }

    fn record(&mut self, case: &TestCase, result: CaseResult) {
        let recorded = self.log.record(
            OutcomeEntry::new(&case.id, result.outcome)
                .with_elapsed(result.elapsed)
                .with_detail(result.detail),
        );
        output::print_progress(
            recorded.position() as usize,
            self.cases.len(),
            &case.id,
            recorded.outcome,
        );
        self.diffs.push(result.diff);
    }

    /// Summarize the log into a report.
    fn into_report(self, run_id: uuid::Uuid, generated_at: DateTime<Utc>) -> RunReport {
        let entries = self
            .log
            .outcomes()
            .into_iter()
            .zip(self.diffs)
            .filter_map(|(recorded, diff)| {
                let case = self.cases.get(recorded.seq as usize)?.clone();
                Some(ReportEntry {
                    case,
                    recorded,
                    diff,
                })
            })
            .collect();
        RunReport::new(
            run_id,
            generated_at,
            self.log.tally(),
            self.log.overall_status(),
            entries,
        )
    }
}

/// Runs the whole suite for one configuration.
pub struct RunController {
    config: HarnessConfig,
    client: Arc<dyn QueryClient>,
    clock: ClockHandle,
}

impl RunController {
    pub fn new(config: HarnessConfig, client: Arc<dyn QueryClient>, clock: ClockHandle) -> Self {
        Self {
            config,
            client,
            clock,
        }
    }

    /// Discover, execute, classify, and report.
    ///
    /// Configuration errors abort before any test runs. An interrupt aborts
    /// the run after removing every unfinalized fresh-output artifact; no
    /// report is written in either case.
    pub async fn run(&self, interrupt: &Interrupt) -> Result<RunSummary, RunError> {
        let config = &self.config;
        self.client
            .available()
            .map_err(|e| RunError::Configuration(e.to_string()))?;

        let cases = discover(&config.scripts_dir, &config.pattern, &config.results_dir)
            .map_err(|e| RunError::Configuration(e.to_string()))?;
        if cases.is_empty() {
            return Err(RunError::Configuration(format!(
                "no scripts matching '{}' in {}",
                config.pattern,
                config.scripts_dir.display()
            )));
        }

        let store = BaselineStore::new(&config.results_dir);
        store
            .ensure_dir()
            .map_err(|e| RunError::Configuration(format!("results directory unusable: {e}")))?;

        let log = match &config.transcript {
            Some(path) => OutcomeLog::with_file(path).map_err(|source| RunError::Io {
                path: path.clone(),
                source,
            })?,
            None => OutcomeLog::new(),
        };

        let guard = Arc::new(TransientGuard::new());
        let worker = CaseWorker {
            executor: Executor::new(Arc::clone(&self.client), config.timeout),
            comparator: Comparator::new(config.normalize),
            store,
            guard: Arc::clone(&guard),
        };
        let mut recorder = Recorder::new(&cases, log);

        tracing::info!(count = cases.len(), jobs = config.jobs, "starting run");
        let driven = if config.jobs <= 1 || cases.len() == 1 {
            run_sequential(&worker, &cases, &mut recorder, interrupt).await
        } else {
            run_parallel(&worker, &cases, config.jobs, &mut recorder, interrupt).await
        };

        if let Err(e) = driven {
            let removed = guard.cleanup();
            tracing::warn!(error = %e, removed, "run aborted");
            return Err(e);
        }

        let report = recorder.into_report(uuid::Uuid::new_v4(), self.clock.now_utc());
        let paths = report.write(&config.reports_dir)?;
        Ok(RunSummary { report, paths })
    }
}

async fn run_sequential(
    worker: &CaseWorker,
    cases: &[TestCase],
    recorder: &mut Recorder<'_>,
    interrupt: &Interrupt,
) -> Result<(), RunError> {
    for case in cases {
        if interrupt.is_triggered() {
            return Err(RunError::Interrupted);
        }
        let result = tokio::select! {
            biased;
            _ = interrupt.triggered() => return Err(RunError::Interrupted),
            result = worker.process(case) => result,
        };
        recorder.record(case, result);
    }
    Ok(())
}

async fn run_parallel(
    worker: &CaseWorker,
    cases: &[TestCase],
    jobs: usize,
    recorder: &mut Recorder<'_>,
    interrupt: &Interrupt,
) -> Result<(), RunError> {
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut tasks = JoinSet::new();
    for (index, case) in cases.iter().cloned().enumerate() {
        let worker = worker.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = semaphore.acquire_owned().await.ok();
            let result = worker.process(&case).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<CaseResult>> = cases.iter().map(|_| None).collect();
    let mut next = 0;
    let outcome = loop {
        let joined = tokio::select! {
            biased;
            _ = interrupt.triggered() => break Err(RunError::Interrupted),
            joined = tasks.join_next() => joined,
        };
        let Some(joined) = joined else {
            break Ok(());
        };
        let (index, result) = match joined {
            Ok(done) => done,
            Err(e) => break Err(RunError::Worker(e.to_string())),
        };
        slots[index] = Some(result);

        // Flush the contiguous prefix so outcomes land in discovery order
        while let Some(result) = slots.get_mut(next).and_then(Option::take) {
            recorder.record(&cases[next], result);
            next += 1;
        }
    };

    if outcome.is_err() {
        // Wait for in-flight workers to drop their clients before cleanup
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
    }
    outcome
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
