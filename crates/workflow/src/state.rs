// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutating façade over the workflow projection: every public method
//! either emits exactly one event and advances `state` to match, or
//! returns an error and changes nothing.

use crate::error::WorkflowError;
use jc_core::id::FeatureName;
use jc_core::{validate_task_id, Clock, Event, EventRecord, SystemClock, WorkflowId};
use jc_projection::{rebuild_projection, Builder, Feature, Phase, WorkflowBuilder, WorkflowState};
use jc_store::EventStore;

pub struct WorkflowFacade<'store, C: Clock = SystemClock> {
    store: &'store EventStore<C>,
    workflow_id: WorkflowId,
    state: WorkflowState,
}

impl<'store, C: Clock> WorkflowFacade<'store, C> {
    /// Starts a new workflow: emits `workflow.started` and sets phase to
    /// `planning`.
    pub fn start(
        store: &'store EventStore<C>,
        workflow_id: WorkflowId,
        description: Option<String>,
        beads_task_id: Option<String>,
    ) -> Result<Self, WorkflowError> {
        if let Some(task_id) = &beads_task_id {
            validate_task_id(task_id)?;
        }
        let mut facade = Self {
            store,
            workflow_id,
            state: WorkflowState::default(),
        };
        facade.emit(Event::WorkflowStarted {
            description,
            beads_task_id,
        })?;
        Ok(facade)
    }

    /// Resumes an existing workflow by replaying its event log.
    pub fn load(store: &'store EventStore<C>, workflow_id: WorkflowId) -> Result<Self, WorkflowError> {
        let state = rebuild_projection(store, &workflow_id, &WorkflowBuilder)?;
        Ok(Self {
            store,
            workflow_id,
            state,
        })
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn feature(&self, name: &FeatureName) -> Result<&Feature, WorkflowError> {
        self.state
            .features
            .iter()
            .find(|feature| &feature.name == name)
            .ok_or_else(|| WorkflowError::UnknownFeature(name.to_string()))
    }

    pub fn transition_phase(&mut self, to: Phase) -> Result<(), WorkflowError> {
        let from = self.state.phase;
        if !valid_transition(from, to) {
            return Err(WorkflowError::InvalidPhaseTransition {
                from: phase_name(from).to_string(),
                to: phase_name(to).to_string(),
            });
        }
        self.emit(Event::PhaseChanged {
            from_phase: Some(phase_name(from).to_string()),
            to_phase: phase_name(to).to_string(),
        })
    }

    pub fn plan_feature(
        &mut self,
        name: FeatureName,
        description: String,
        test_file: Option<String>,
    ) -> Result<(), WorkflowError> {
        self.emit(Event::FeaturePlanned {
            name,
            description,
            test_file,
        })
    }

    pub fn start_feature(&mut self, name: &FeatureName) -> Result<(), WorkflowError> {
        self.require_planned(name)?;
        self.emit(Event::FeatureStarted { name: name.clone() })
    }

    pub fn complete_feature(
        &mut self,
        name: &FeatureName,
        tests_passing: Option<bool>,
        duration_ms: Option<u64>,
    ) -> Result<(), WorkflowError> {
        self.require_planned(name)?;
        self.emit(Event::FeatureCompleted {
            name: name.clone(),
            tests_passing,
            duration_ms,
        })
    }

    pub fn fail_feature(&mut self, name: &FeatureName, error: Option<String>) -> Result<(), WorkflowError> {
        self.require_planned(name)?;
        self.emit(Event::FeatureFailed { name: name.clone(), error })
    }

    pub fn record_tests_started(
        &mut self,
        test_file: String,
        feature: Option<FeatureName>,
    ) -> Result<(), WorkflowError> {
        self.emit(Event::TestsStarted { test_file, feature })
    }

    pub fn record_tests_passed(
        &mut self,
        test_file: String,
        feature: Option<FeatureName>,
        count: Option<u32>,
        duration_ms: Option<u64>,
    ) -> Result<(), WorkflowError> {
        self.emit(Event::TestsPassed {
            test_file,
            feature,
            count,
            duration_ms,
        })
    }

    pub fn record_tests_failed(
        &mut self,
        test_file: String,
        feature: Option<FeatureName>,
        failures: Vec<String>,
    ) -> Result<(), WorkflowError> {
        self.emit(Event::TestsFailed {
            test_file,
            feature,
            failures,
        })
    }

    pub fn record_commit_created(
        &mut self,
        commit_sha: String,
        message: String,
        files: Vec<String>,
    ) -> Result<(), WorkflowError> {
        self.emit(Event::CommitCreated {
            commit_sha,
            message,
            files,
        })
    }

    pub fn record_commit_failed(&mut self, error: String, files: Vec<String>) -> Result<(), WorkflowError> {
        self.emit(Event::CommitFailed { error, files })
    }

    /// Only valid from `verifying` or `implementing`; sets phase to
    /// `complete` as part of the single `workflow.completed` event rather
    /// than a separate `phase.changed`.
    pub fn complete_workflow(
        &mut self,
        duration_ms: Option<u64>,
        total_cost: Option<f64>,
    ) -> Result<(), WorkflowError> {
        let from = self.state.phase;
        if !matches!(from, Phase::Verifying | Phase::Implementing) {
            return Err(WorkflowError::InvalidPhaseTransition {
                from: phase_name(from).to_string(),
                to: phase_name(Phase::Complete).to_string(),
            });
        }
        self.emit(Event::WorkflowCompleted { duration_ms, total_cost })
    }

    pub fn fail_workflow(&mut self, error: Option<String>) -> Result<(), WorkflowError> {
        let phase = Some(phase_name(self.state.phase).to_string());
        self.emit(Event::WorkflowFailed { error, phase })
    }

    fn require_planned(&self, name: &FeatureName) -> Result<(), WorkflowError> {
        self.state
            .features
            .iter()
            .any(|feature| &feature.name == name)
            .then_some(())
            .ok_or_else(|| WorkflowError::FeatureNotPlanned(name.to_string()))
    }

    fn emit(&mut self, event: Event) -> Result<(), WorkflowError> {
        let record: EventRecord = self.store.append(&self.workflow_id, event)?;
        self.state = WorkflowBuilder.apply(self.state.clone(), &record)?;
        Ok(())
    }
}

fn valid_transition(from: Phase, to: Phase) -> bool {
    matches!(
        (from, to),
        (Phase::Planning, Phase::Implementing)
            | (Phase::Implementing, Phase::Verifying)
            | (Phase::Implementing, Phase::Complete)
            | (Phase::Verifying, Phase::Implementing)
            | (Phase::Verifying, Phase::Complete)
    )
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Planning => "planning",
        Phase::Implementing => "implementing",
        Phase::Verifying => "verifying",
        Phase::Complete => "complete",
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
