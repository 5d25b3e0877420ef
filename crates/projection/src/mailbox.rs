// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent mailbox view, materialized from `agent.message.*` events.
//!
//! Every event in the closed taxonomy is visible to every builder
//! instance; `MailboxBuilder` filters by `current_agent_id` so the same
//! event stream produces a different view per participant.

use crate::error::ProjectionError;
use crate::Builder;
use chrono::{DateTime, Utc};
use jc_core::{AgentId, Event, EventRecord, Priority};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub event_id: Uuid,
    pub message_id: Uuid,
    pub from: AgentId,
    pub to: AgentId,
    pub subject: String,
    pub body: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub correlation_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub event_id: Uuid,
    pub message_id: Uuid,
    pub from: AgentId,
    pub to: AgentId,
    pub subject: String,
    pub body: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub sent_at: DateTime<Utc>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub success: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub correlation_id: Uuid,
    pub from: AgentId,
    pub to: AgentId,
    pub subject: String,
    pub body: String,
    pub success: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxState {
    pub inbox: Vec<InboxMessage>,
    pub outbox: Vec<OutboxMessage>,
    pub conversation_history: Vec<ConversationMessage>,
}

/// Materializes the mailbox for a single participant. Two instances with
/// different `current_agent_id`s folding the same stream see different
/// (but individually consistent) views.
#[derive(Debug, Clone)]
pub struct MailboxBuilder {
    pub current_agent_id: AgentId,
}

impl MailboxBuilder {
    pub fn new(current_agent_id: AgentId) -> Self {
        Self { current_agent_id }
    }
}

impl Builder for MailboxBuilder {
    type State = MailboxState;

    fn initial_state(&self) -> Self::State {
        MailboxState::default()
    }

    fn apply(&self, mut state: Self::State, record: &EventRecord) -> Result<Self::State, ProjectionError> {
        match &record.data {
            Event::AgentMessageSent {
                from,
                to,
                subject,
                body,
                priority,
                correlation_id,
                message_id,
                created_at,
                sent_at,
            } => {
                if *to == self.current_agent_id {
                    state.inbox.push(InboxMessage {
                        event_id: record.event_id,
                        message_id: *message_id,
                        from: from.clone(),
                        to: to.clone(),
                        subject: subject.clone(),
                        body: body.clone(),
                        priority: *priority,
                        created_at: *created_at,
                        received_at: record.timestamp,
                        acknowledged: false,
                        acknowledged_at: None,
                        correlation_id: *correlation_id,
                    });
                }
                if *from == self.current_agent_id {
                    state.outbox.push(OutboxMessage {
                        event_id: record.event_id,
                        message_id: *message_id,
                        from: from.clone(),
                        to: to.clone(),
                        subject: subject.clone(),
                        body: body.clone(),
                        priority: *priority,
                        created_at: *created_at,
                        sent_at: *sent_at,
                        completed: false,
                        completed_at: None,
                        success: None,
                    });
                }
            }
            Event::AgentMessageAcknowledged {
                correlation_id,
                from,
                acknowledged_at,
            } => {
                if *from == self.current_agent_id {
                    if let Some(entry) = state
                        .inbox
                        .iter_mut()
                        .find(|msg| msg.event_id == *correlation_id)
                    {
                        if !entry.acknowledged {
                            entry.acknowledged = true;
                            entry.acknowledged_at = Some(*acknowledged_at);
                        }
                    }
                }
            }
            Event::AgentMessageCompleted {
                correlation_id,
                from,
                completed_at,
                success,
                result: _,
            } => {
                if *from == self.current_agent_id {
                    if let Some(pos) = state
                        .outbox
                        .iter()
                        .position(|msg| msg.event_id == *correlation_id)
                    {
                        let entry = state.outbox.remove(pos);
                        state.conversation_history.push(ConversationMessage {
                            correlation_id: *correlation_id,
                            from: entry.from,
                            to: entry.to,
                            subject: entry.subject,
                            body: entry.body,
                            success: *success,
                            completed_at: *completed_at,
                        });
                    }
                }
            }
            Event::Custom => {
                return Err(ProjectionError::UnknownEventType(record.data.event_type().to_string()));
            }
            _ => {}
        }
        Ok(state)
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
