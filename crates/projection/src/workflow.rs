// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canonical workflow projection: phase graph, ordered feature list,
//! and running counters.

use crate::error::ProjectionError;
use crate::Builder;
use chrono::{DateTime, Utc};
use jc_core::id::FeatureName;
use jc_core::{Event, EventRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Planning,
    Implementing,
    Verifying,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Phase::Planning => "planning",
            Phase::Implementing => "implementing",
            Phase::Verifying => "verifying",
            Phase::Complete => "complete",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: FeatureName,
    pub description: String,
    pub status: FeatureStatus,
    pub tests_passing: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub phase: Phase,
    pub description: Option<String>,
    pub beads_task_id: Option<String>,
    pub features: Vec<Feature>,
    pub current_feature_index: usize,
    pub iteration_count: u64,
    pub total_cost_usd: f64,
    pub total_duration_ms: u64,
    pub verification_count: u64,
    pub last_verification_passed: bool,
    pub last_error: Option<String>,
    pub commits: Vec<String>,
}

impl WorkflowState {
    pub fn completed_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.status == FeatureStatus::Completed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.status == FeatureStatus::Failed)
            .count()
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.features.is_empty() {
            0.0
        } else {
            self.completed_count() as f64 / self.features.len() as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
            && !self.features.is_empty()
            && self.features.iter().all(|f| f.status == FeatureStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        self.phase != Phase::Complete && self.features.iter().any(|f| f.status == FeatureStatus::Failed)
    }

    fn feature_mut(&mut self, name: &FeatureName) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| &f.name == name)
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            phase: Phase::Planning,
            description: None,
            beads_task_id: None,
            features: Vec::new(),
            current_feature_index: 0,
            iteration_count: 0,
            total_cost_usd: 0.0,
            total_duration_ms: 0,
            verification_count: 0,
            last_verification_passed: true,
            last_error: None,
            commits: Vec::new(),
        }
    }
}

/// Materializes [`WorkflowState`] from the event log. Ignores worktree,
/// commit, agent-messaging, and note events entirely — they carry no
/// workflow-state-relevant fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkflowBuilder;

impl Builder for WorkflowBuilder {
    type State = WorkflowState;

    fn initial_state(&self) -> Self::State {
        WorkflowState::default()
    }

    fn apply(&self, mut state: Self::State, record: &EventRecord) -> Result<Self::State, ProjectionError> {
        let event = &record.data;
        match event {
            Event::WorkflowStarted {
                description,
                beads_task_id,
            } => {
                state.phase = Phase::Planning;
                state.description = description.clone();
                state.beads_task_id = beads_task_id.clone();
            }
            Event::WorkflowCompleted { duration_ms, total_cost } => {
                state.phase = Phase::Complete;
                if let Some(duration_ms) = duration_ms {
                    state.total_duration_ms = state.total_duration_ms.max(*duration_ms);
                }
                if let Some(total_cost) = total_cost {
                    state.total_cost_usd = state.total_cost_usd.max(*total_cost);
                }
            }
            Event::WorkflowFailed { error, phase } => {
                state.last_error = error.clone();
                let _ = phase;
            }
            Event::PhaseChanged { to_phase, .. } => {
                state.phase = parse_phase(to_phase).unwrap_or(state.phase);
            }
            Event::FeaturePlanned {
                name,
                description,
                test_file,
            } => {
                let _ = test_file;
                state.features.push(Feature {
                    name: name.clone(),
                    description: description.clone(),
                    status: FeatureStatus::NotStarted,
                    tests_passing: false,
                    started_at: None,
                    completed_at: None,
                });
            }
            Event::FeatureStarted { name } => {
                if let Some(feature) = state.feature_mut(name) {
                    feature.status = FeatureStatus::InProgress;
                }
            }
            Event::FeatureCompleted {
                name,
                tests_passing,
                duration_ms,
            } => {
                if let Some(duration_ms) = duration_ms {
                    state.total_duration_ms += *duration_ms;
                }
                if let Some(feature) = state.feature_mut(name) {
                    feature.status = FeatureStatus::Completed;
                    if let Some(tests_passing) = tests_passing {
                        feature.tests_passing = *tests_passing;
                    }
                }
                state.current_feature_index = state.current_feature_index.saturating_add(1);
            }
            Event::FeatureFailed { name, error } => {
                if let Some(feature) = state.feature_mut(name) {
                    feature.status = FeatureStatus::Failed;
                }
                state.last_error = error.clone();
            }
            Event::TestsStarted { .. } => {
                state.iteration_count += 1;
            }
            Event::TestsPassed { feature, .. } => {
                if let Some(feature) = feature.as_ref().and_then(|name| state.feature_mut(name)) {
                    feature.tests_passing = true;
                }
                state.verification_count += 1;
                state.last_verification_passed = true;
            }
            Event::TestsFailed { feature, .. } => {
                if let Some(feature) = feature.as_ref().and_then(|name| state.feature_mut(name)) {
                    feature.tests_passing = false;
                }
                state.verification_count += 1;
                state.last_verification_passed = false;
            }
            Event::CommitCreated { commit_sha, .. } => {
                state.commits.push(commit_sha.clone());
            }
            Event::CommitFailed { .. } => {}
            Event::WorktreeCreated { .. }
            | Event::WorktreeActive { .. }
            | Event::WorktreeMerged { .. }
            | Event::WorktreeDeleted { .. } => {}
            Event::AgentMessageSent { .. }
            | Event::AgentMessageAcknowledged { .. }
            | Event::AgentMessageCompleted { .. } => {}
            Event::AgentNoteObservation { .. }
            | Event::AgentNoteLearning { .. }
            | Event::AgentNoteDecision { .. }
            | Event::AgentNoteWarning { .. }
            | Event::AgentNoteAccomplishment { .. }
            | Event::AgentNoteContext { .. }
            | Event::AgentNoteTodo { .. }
            | Event::AgentNoteQuestion { .. }
            | Event::AgentNoteIdea { .. }
            | Event::AgentNoteReflection { .. } => {}
            Event::Custom => return Err(ProjectionError::UnknownEventType(event.event_type().to_string())),
        }
        Ok(state)
    }
}

fn parse_phase(text: &str) -> Option<Phase> {
    match text {
        "planning" => Some(Phase::Planning),
        "implementing" => Some(Phase::Implementing),
        "verifying" => Some(Phase::Verifying),
        "complete" => Some(Phase::Complete),
        _ => None,
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
