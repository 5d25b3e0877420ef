// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, format_time_ago, OutputFormat};
use jc_core::WorkflowId;
use jc_store::{EventOrder, EventStore};
use jc_workflow::{evaluate, WorkflowFacade};
use std::path::Path;

fn open_store(path: &Path) -> anyhow::Result<EventStore> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(EventStore::open(path)?)
}

pub fn work(
    store_path: &Path,
    task_id: String,
    description: Option<String>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let store = open_store(store_path)?;
    let workflow_id = WorkflowId::new(task_id.clone());
    let facade = WorkflowFacade::start(&store, workflow_id, description, Some(task_id))
        .map_err(|err| ExitError::new(2, err.to_string()))?;

    format_or_json(output, facade.state(), || {
        println!(
            "{} workflow {} ({})",
            color::header("started"),
            facade.workflow_id(),
            facade.state().phase
        );
    })
}

pub fn status(store_path: &Path, workflow_id: String, output: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(store_path)?;
    let workflow_id = WorkflowId::new(workflow_id);
    let facade =
        WorkflowFacade::load(&store, workflow_id.clone()).map_err(|err| ExitError::new(2, err.to_string()))?;
    let state = facade.state();

    format_or_json(output, state, || {
        println!("workflow   {}", color::header(workflow_id.as_str()));
        println!("phase      {}", state.phase);
        println!(
            "features   {}/{} complete ({:.0}%)",
            state.completed_count(),
            state.features.len(),
            state.progress_percentage() * 100.0
        );
        if state.failed_count() > 0 {
            println!("failures   {}", color::muted(&state.failed_count().to_string()));
        }
        if facade.is_complete() {
            let evaluation = evaluate(state);
            println!("grade      {} ({:.0}%)", evaluation.grade, evaluation.quality_score * 100.0);
            println!("summary    {}", evaluation.summary);
            for rec in &evaluation.recommendations {
                println!("  - {rec}");
            }
        }
    })
}

pub fn logs(
    store_path: &Path,
    workflow_id: String,
    event_type: Option<String>,
    limit: i64,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let store = open_store(store_path)?;
    let workflow_id = WorkflowId::new(workflow_id);
    let records = store.get_events(
        &workflow_id,
        event_type.as_deref(),
        EventOrder::Asc,
        Some(limit),
        None,
    )?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("no events recorded for {workflow_id}");
            }
            for record in &records {
                println!(
                    "{:>6}  {}  {}  {}",
                    record.sequence_number,
                    color::muted(&format_time_ago(record.timestamp.timestamp_millis().max(0) as u64)),
                    color::literal(record.data.event_type()),
                    record.event_id
                );
            }
        }
    }
    Ok(())
}
