// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Snapshot` record type. Storage and auto-snapshot policy live in
//! `jc-store`; this crate only defines the shape.

use crate::id::WorkflowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A materialized projection at a known sequence number, used to skip
/// replay. At most one lives per workflow at rest (upsert keyed by
/// `workflow_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub workflow_id: WorkflowId,
    pub sequence_number: i64,
    pub state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
