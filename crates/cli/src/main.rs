// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;
use exit_error::ExitError;
use output::OutputFormat;
use std::path::PathBuf;

/// Durable, event-sourced workflow runner.
#[derive(Parser)]
#[command(name = "jc", version, styles = color::styles())]
struct Cli {
    /// Path to the SQLite event store. Defaults to a per-user data directory.
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start a new workflow for a task-tracker id and drive it to planning.
    Work {
        /// Task-tracker id, e.g. "PROJ-123".
        task_id: String,
        /// Human-readable description recorded on workflow.started.
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Show the current projected state of a workflow.
    Status {
        workflow_id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Print the raw event log for a workflow.
    Logs {
        workflow_id: String,
        /// Only show events of this type, e.g. "feature.completed".
        #[arg(long)]
        event_type: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("jc")
        .join("events.db")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store_path = cli.store_path.unwrap_or_else(default_store_path);

    let result = match cli.command {
        Command::Work {
            task_id,
            description,
            output,
        } => commands::work(&store_path, task_id, description, output),
        Command::Status { workflow_id, output } => commands::status(&store_path, workflow_id, output),
        Command::Logs {
            workflow_id,
            event_type,
            limit,
            output,
        } => commands::logs(&store_path, workflow_id, event_type, limit, output),
    };

    if let Err(err) = result {
        let exit_err = err.downcast_ref::<ExitError>();
        eprintln!("error: {err}");
        std::process::exit(exit_err.map(|e| e.code).unwrap_or(1));
    }
}
