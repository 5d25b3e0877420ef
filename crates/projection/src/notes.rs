// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only notes list plus the three lookup indexes over it.

use crate::error::ProjectionError;
use crate::Builder;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use jc_core::{AgentId, Event, EventRecord, NoteCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub agent: AgentId,
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
    pub tags: Vec<String>,
    pub related_file: Option<String>,
    pub related_feature: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub by_category: IndexMap<NoteCategory, Vec<usize>>,
    pub by_agent: IndexMap<AgentId, Vec<usize>>,
    pub by_tag: IndexMap<String, Vec<usize>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NotesBuilder;

impl Builder for NotesBuilder {
    type State = NotesState;

    fn initial_state(&self) -> Self::State {
        NotesState::default()
    }

    fn apply(&self, mut state: Self::State, record: &EventRecord) -> Result<Self::State, ProjectionError> {
        let event = &record.data;
        let Some(category) = event.note_category() else {
            if matches!(event, Event::Custom) {
                return Err(ProjectionError::UnknownEventType(event.event_type().to_string()));
            }
            return Ok(state);
        };
        let note = match event {
            Event::AgentNoteObservation { note }
            | Event::AgentNoteLearning { note }
            | Event::AgentNoteDecision { note }
            | Event::AgentNoteWarning { note }
            | Event::AgentNoteAccomplishment { note }
            | Event::AgentNoteContext { note }
            | Event::AgentNoteTodo { note }
            | Event::AgentNoteQuestion { note }
            | Event::AgentNoteIdea { note }
            | Event::AgentNoteReflection { note } => note,
            _ => unreachable!("note_category() is Some only for agent.note.* events"),
        };

        let position = state.notes.len();
        state.by_category.entry(category).or_default().push(position);
        state.by_agent.entry(note.agent.clone()).or_default().push(position);
        for tag in &note.tags {
            state.by_tag.entry(tag.clone()).or_default().push(position);
        }
        state.notes.push(Note {
            agent: note.agent.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            category,
            tags: note.tags.clone(),
            related_file: note.related_file.clone(),
            related_feature: note.related_feature.as_ref().map(ToString::to_string),
            created_at: record.timestamp,
        });
        Ok(state)
    }
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
