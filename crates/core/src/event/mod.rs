// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the workflow runtime.

mod dispatch;

pub use dispatch::NoteCategory;

use crate::id::{AgentId, FeatureName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Message urgency on the mailbox subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

/// Why a worktree was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorktreeDeleteReason {
    Merged,
    Failed,
    Manual,
}

/// Fields common to every `agent.note.*` event; the category lives in the
/// serde tag rather than as a field, since it's part of the closed taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentNoteFields {
    pub agent: AgentId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_feature: Option<FeatureName>,
}

/// The durable payload of one committed event.
///
/// Serializes with `{"type": "category.action", ...fields}`. Unknown type
/// tags deserialize to `Custom`, reserved for forward-compatible replay of
/// payloads this binary doesn't yet know about; [`dispatch`] rejects
/// `Custom` with a typed error rather than skipping it silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- workflow --
    #[serde(rename = "workflow.started")]
    WorkflowStarted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        beads_task_id: Option<String>,
    },

    #[serde(rename = "workflow.completed")]
    WorkflowCompleted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_cost: Option<f64>,
    },

    #[serde(rename = "workflow.failed")]
    WorkflowFailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<String>,
    },

    #[serde(rename = "phase.changed")]
    PhaseChanged {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_phase: Option<String>,
        to_phase: String,
    },

    // -- worktree (infrastructure, opaque to most builders) --
    #[serde(rename = "worktree.created")]
    WorktreeCreated {
        path: PathBuf,
        branch: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_commit: Option<String>,
    },

    #[serde(rename = "worktree.active")]
    WorktreeActive { path: PathBuf },

    #[serde(rename = "worktree.merged")]
    WorktreeMerged {
        commit_sha: String,
        #[serde(default)]
        conflicts: Vec<String>,
    },

    #[serde(rename = "worktree.deleted")]
    WorktreeDeleted { reason: WorktreeDeleteReason },

    // -- feature --
    #[serde(rename = "feature.planned")]
    FeaturePlanned {
        name: FeatureName,
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        test_file: Option<String>,
    },

    #[serde(rename = "feature.started")]
    FeatureStarted { name: FeatureName },

    #[serde(rename = "feature.completed")]
    FeatureCompleted {
        name: FeatureName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tests_passing: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },

    #[serde(rename = "feature.failed")]
    FeatureFailed {
        name: FeatureName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    // -- tests --
    #[serde(rename = "tests.started")]
    TestsStarted {
        test_file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature: Option<FeatureName>,
    },

    #[serde(rename = "tests.passed")]
    TestsPassed {
        test_file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature: Option<FeatureName>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },

    #[serde(rename = "tests.failed")]
    TestsFailed {
        test_file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature: Option<FeatureName>,
        #[serde(default)]
        failures: Vec<String>,
    },

    // -- commits --
    #[serde(rename = "commit.created")]
    CommitCreated {
        commit_sha: String,
        message: String,
        #[serde(default)]
        files: Vec<String>,
    },

    #[serde(rename = "commit.failed")]
    CommitFailed {
        error: String,
        #[serde(default)]
        files: Vec<String>,
    },

    // -- agent messaging --
    #[serde(rename = "agent.message.sent")]
    AgentMessageSent {
        from: AgentId,
        to: AgentId,
        subject: String,
        body: String,
        priority: Priority,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correlation_id: Option<Uuid>,
        message_id: Uuid,
        created_at: DateTime<Utc>,
        sent_at: DateTime<Utc>,
    },

    #[serde(rename = "agent.message.acknowledged")]
    AgentMessageAcknowledged {
        correlation_id: Uuid,
        from: AgentId,
        acknowledged_at: DateTime<Utc>,
    },

    #[serde(rename = "agent.message.completed")]
    AgentMessageCompleted {
        correlation_id: Uuid,
        from: AgentId,
        completed_at: DateTime<Utc>,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },

    // -- notes --
    #[serde(rename = "agent.note.observation")]
    AgentNoteObservation {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.learning")]
    AgentNoteLearning {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.decision")]
    AgentNoteDecision {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.warning")]
    AgentNoteWarning {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.accomplishment")]
    AgentNoteAccomplishment {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.context")]
    AgentNoteContext {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.todo")]
    AgentNoteTodo {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.question")]
    AgentNoteQuestion {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.idea")]
    AgentNoteIdea {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    #[serde(rename = "agent.note.reflection")]
    AgentNoteReflection {
        #[serde(flatten)]
        note: AgentNoteFields,
    },

    /// Catch-all for event types this binary doesn't recognize (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

/// One durable, immutable record in the log: the assigned sequence number,
/// a globally unique event id, the workflow it scopes to, a commit
/// timestamp, and the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence_number: i64,
    pub event_id: Uuid,
    pub workflow_id: crate::id::WorkflowId,
    pub timestamp: DateTime<Utc>,
    pub data: Event,
}

#[cfg(test)]
#[path = "../event_tests.rs"]
mod tests;
