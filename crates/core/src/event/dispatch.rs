// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Event::event_type()` / `log_summary()` — the match-dispatch surface
//! shared by the store (logging) and the projection engine (error
//! messages). The projection `Builder::apply` dispatch itself lives in
//! `jc-projection`, since it needs per-builder state; this module only
//! gives every crate a single place to name an event.

use super::Event;
use serde::{Deserialize, Serialize};

/// Category carried by an `agent.note.*` event's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    Observation,
    Learning,
    Decision,
    Warning,
    Accomplishment,
    Context,
    Todo,
    Question,
    Idea,
    Reflection,
}

impl std::fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_type().strip_prefix("agent.note.").unwrap_or(""))
    }
}

impl NoteCategory {
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Observation => "agent.note.observation",
            Self::Learning => "agent.note.learning",
            Self::Decision => "agent.note.decision",
            Self::Warning => "agent.note.warning",
            Self::Accomplishment => "agent.note.accomplishment",
            Self::Context => "agent.note.context",
            Self::Todo => "agent.note.todo",
            Self::Question => "agent.note.question",
            Self::Idea => "agent.note.idea",
            Self::Reflection => "agent.note.reflection",
        }
    }
}

impl Event {
    /// The closed-taxonomy string tag this event serializes under.
    pub fn event_type(&self) -> &'static str {
        use Event::*;
        match self {
            WorkflowStarted { .. } => "workflow.started",
            WorkflowCompleted { .. } => "workflow.completed",
            WorkflowFailed { .. } => "workflow.failed",
            PhaseChanged { .. } => "phase.changed",
            WorktreeCreated { .. } => "worktree.created",
            WorktreeActive { .. } => "worktree.active",
            WorktreeMerged { .. } => "worktree.merged",
            WorktreeDeleted { .. } => "worktree.deleted",
            FeaturePlanned { .. } => "feature.planned",
            FeatureStarted { .. } => "feature.started",
            FeatureCompleted { .. } => "feature.completed",
            FeatureFailed { .. } => "feature.failed",
            TestsStarted { .. } => "tests.started",
            TestsPassed { .. } => "tests.passed",
            TestsFailed { .. } => "tests.failed",
            CommitCreated { .. } => "commit.created",
            CommitFailed { .. } => "commit.failed",
            AgentMessageSent { .. } => "agent.message.sent",
            AgentMessageAcknowledged { .. } => "agent.message.acknowledged",
            AgentMessageCompleted { .. } => "agent.message.completed",
            AgentNoteObservation { .. } => NoteCategory::Observation.event_type(),
            AgentNoteLearning { .. } => NoteCategory::Learning.event_type(),
            AgentNoteDecision { .. } => NoteCategory::Decision.event_type(),
            AgentNoteWarning { .. } => NoteCategory::Warning.event_type(),
            AgentNoteAccomplishment { .. } => NoteCategory::Accomplishment.event_type(),
            AgentNoteContext { .. } => NoteCategory::Context.event_type(),
            AgentNoteTodo { .. } => NoteCategory::Todo.event_type(),
            AgentNoteQuestion { .. } => NoteCategory::Question.event_type(),
            AgentNoteIdea { .. } => NoteCategory::Idea.event_type(),
            AgentNoteReflection { .. } => NoteCategory::Reflection.event_type(),
            Custom => "custom",
        }
    }

    /// `Some(category)` for `agent.note.*` events, `None` otherwise.
    pub fn note_category(&self) -> Option<NoteCategory> {
        use Event::*;
        Some(match self {
            AgentNoteObservation { .. } => NoteCategory::Observation,
            AgentNoteLearning { .. } => NoteCategory::Learning,
            AgentNoteDecision { .. } => NoteCategory::Decision,
            AgentNoteWarning { .. } => NoteCategory::Warning,
            AgentNoteAccomplishment { .. } => NoteCategory::Accomplishment,
            AgentNoteContext { .. } => NoteCategory::Context,
            AgentNoteTodo { .. } => NoteCategory::Todo,
            AgentNoteQuestion { .. } => NoteCategory::Question,
            AgentNoteIdea { .. } => NoteCategory::Idea,
            AgentNoteReflection { .. } => NoteCategory::Reflection,
            _ => return None,
        })
    }

    /// True for the `Custom` catch-all, which exists only so an older
    /// binary can deserialize a payload from a newer event type without
    /// erroring during the JSON parse itself; dispatch still rejects it.
    pub fn is_custom(&self) -> bool {
        matches!(self, Event::Custom)
    }

    /// One-line summary for `tracing` spans: the event type plus the
    /// scoping detail most useful to a human reading logs.
    pub fn log_summary(&self) -> String {
        use Event::*;
        match self {
            FeaturePlanned { name, .. }
            | FeatureStarted { name }
            | FeatureCompleted { name, .. }
            | FeatureFailed { name, .. } => format!("{} name={name}", self.event_type()),
            PhaseChanged { from_phase, to_phase } => format!(
                "{} from={} to={to_phase}",
                self.event_type(),
                from_phase.as_deref().unwrap_or("-")
            ),
            AgentMessageSent { from, to, .. } => {
                format!("{} from={from} to={to}", self.event_type())
            }
            _ => self.event_type().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AgentNoteFields, Event};
    use crate::id::{AgentId, FeatureName};

    #[test]
    fn event_type_matches_serde_tag() {
        let event = Event::FeatureStarted {
            name: FeatureName::new("auth"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }

    #[test]
    fn note_category_round_trips_through_event_type() {
        let event = Event::AgentNoteWarning {
            note: AgentNoteFields {
                agent: AgentId::new("reviewer"),
                title: "t".into(),
                content: "c".into(),
                tags: vec![],
                related_file: None,
                related_feature: None,
            },
        };
        assert_eq!(event.note_category(), Some(NoteCategory::Warning));
        assert_eq!(event.event_type(), "agent.note.warning");
    }

    #[test]
    fn custom_is_recognized_and_not_a_note() {
        assert!(Event::Custom.is_custom());
        assert_eq!(Event::Custom.note_category(), None);
    }
}
