// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sqlbaseline binary entry point.

use std::sync::Arc;

use clap::Parser;

use sqlbaseline::cli::Cli;
use sqlbaseline::client::SqlcmdClient;
use sqlbaseline::config::HarnessConfig;
use sqlbaseline::interrupt::Interrupt;
use sqlbaseline::output::{init_tracing, print_error, print_summary, print_warning};
use sqlbaseline::runner::{RunController, RunError, EXIT_ERROR};
use sqlbaseline::time::ClockHandle;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            print_error(format_args!("cannot determine working directory: {}", e));
            std::process::exit(EXIT_ERROR);
        }
    };
    let config = match HarnessConfig::resolve(&cli, &cwd) {
        Ok(config) => config,
        Err(e) => {
            print_error(e);
            std::process::exit(EXIT_ERROR);
        }
    };

    // Without handlers an interrupt kills the process outright and may
    // leave fresh output behind
    let interrupt = Interrupt::install().unwrap_or_else(|e| {
        print_warning(format_args!("failed to install signal handlers: {}", e));
        Interrupt::new()
    });

    let client = Arc::new(SqlcmdClient::from_config(&config));
    let fail_on_regression = config.fail_on_regression;
    let controller = RunController::new(config, client, ClockHandle::system());

    match controller.run(&interrupt).await {
        Ok(summary) => {
            print_summary(&summary.report.tally, summary.status(), &summary.paths.summary);
            std::process::exit(summary.exit_code(fail_on_regression));
        }
        Err(e @ RunError::Interrupted) => {
            print_warning(format_args!("{}; unfinished results removed", e));
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}
