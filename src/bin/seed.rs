// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Populate the configured database with sample classes and students.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use classroom_server::config::AppConfig;
use classroom_server::logging::init_tracing;
use classroom_server::seed;
use classroom_server::storage::open_connection;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = format!("{e:#}"), "Seeding failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> anyhow::Result<()> {
    let conn = open_connection(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;
    info!(path = %config.database_path.display(), "Seeding database");

    seed::run(&conn).context("seed step failed")?;
    Ok(())
}
