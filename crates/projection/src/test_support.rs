// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only helper for wrapping bare [`Event`]s into [`EventRecord`]s,
//! since [`crate::Builder::apply`] folds over the envelope, not just the
//! payload.

use chrono::Utc;
use jc_core::{Event, EventRecord, WorkflowId};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

static NEXT_SEQUENCE: AtomicI64 = AtomicI64::new(1);

pub fn record(event: Event) -> EventRecord {
    record_for(WorkflowId::new("test-workflow"), event)
}

pub fn record_for(workflow_id: WorkflowId, event: Event) -> EventRecord {
    EventRecord {
        sequence_number: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        event_id: Uuid::new_v4(),
        workflow_id,
        timestamp: Utc::now(),
        data: event,
    }
}
