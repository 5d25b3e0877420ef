// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges [`jc_store::EventStore`] and [`crate::Builder`].
//!
//! Lives here rather than as an `EventStore` method: an `EventStore`
//! method taking `impl Builder` would pull this crate's trait down into
//! `jc-store`, either inverting the store→projection dependency or
//! forcing `Builder` itself into `jc-core`. A free function keeps
//! `jc-store` ignorant of projections entirely.

use crate::Builder;
use jc_core::{Clock, WorkflowId};
use jc_store::{EventOrder, EventStore, StoreError};

/// Loads the latest snapshot (if any) as the starting point, then folds
/// every event committed after it through `builder`. Falls back to
/// `builder.initial_state()` when no snapshot exists.
pub fn rebuild_projection<C, B>(
    store: &EventStore<C>,
    workflow_id: &WorkflowId,
    builder: &B,
) -> Result<B::State, RebuildError>
where
    C: Clock,
    B: Builder,
    B::State: serde::de::DeserializeOwned,
{
    let snapshot = store.get_snapshot(workflow_id)?;
    let (mut state, lower_bound) = match snapshot {
        Some(snapshot) => (
            serde_json::from_value(snapshot.state).map_err(RebuildError::CorruptSnapshot)?,
            snapshot.sequence_number,
        ),
        None => (builder.initial_state(), 0),
    };
    let events = store.get_events(workflow_id, None, EventOrder::Asc, None, None)?;
    for record in events.into_iter().filter(|record| record.sequence_number > lower_bound) {
        state = builder.apply(state, &record)?;
    }
    Ok(state)
}

#[derive(Debug, thiserror::Error)]
pub enum RebuildError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Projection(#[from] crate::ProjectionError),
    #[error("snapshot state does not match the builder's state shape: {0}")]
    CorruptSnapshot(serde_json::Error),
}

#[cfg(test)]
#[path = "rebuild_tests.rs"]
mod tests;
