// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only query helpers over a [`MailboxState`] projection: thread
//! lookup, summaries, and a consistency check across the whole view.

use chrono::{DateTime, Utc};
use jc_projection::{ConversationMessage, InboxMessage, MailboxState, OutboxMessage};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessages<'a> {
    pub inbox: Vec<&'a InboxMessage>,
    pub outbox: Vec<&'a OutboxMessage>,
    pub history: Vec<&'a ConversationMessage>,
}

impl<'a> ThreadMessages<'a> {
    pub fn all_count(&self) -> usize {
        self.inbox.len() + self.outbox.len() + self.history.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Active,
    Completed,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEventKind {
    Received,
    Sent,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub at: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub kind: TimelineEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSummary {
    pub participants: Vec<String>,
    pub message_count: usize,
    pub timeline: Vec<TimelineEntry>,
    pub status: ThreadStatus,
    pub pending_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThreadStatistics {
    pub total_threads: usize,
    pub total_messages: usize,
    pub orphaned_threads: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyReport {
    pub valid: bool,
    pub inconsistencies: Vec<String>,
    pub thread_statistics: ThreadStatistics,
}

/// Everything in the view that carries `cid` as its correlation key,
/// matched against the sent event's `event_id` (inbox/outbox) or the
/// completion's own `correlation_id` (history).
pub fn get_messages_by_correlation_id(state: &MailboxState, cid: Uuid) -> ThreadMessages<'_> {
    ThreadMessages {
        inbox: state
            .inbox
            .iter()
            .filter(|msg| msg.event_id == cid || msg.correlation_id == Some(cid))
            .collect(),
        outbox: state
            .outbox
            .iter()
            .filter(|msg| msg.event_id == cid)
            .collect(),
        history: state
            .conversation_history
            .iter()
            .filter(|msg| msg.correlation_id == cid)
            .collect(),
    }
}

pub fn get_thread_summary(state: &MailboxState, cid: Uuid) -> ThreadSummary {
    let thread = get_messages_by_correlation_id(state, cid);
    let mut participants: HashSet<String> = HashSet::new();
    for msg in &thread.inbox {
        participants.insert(msg.from.to_string());
        participants.insert(msg.to.to_string());
    }
    for msg in &thread.outbox {
        participants.insert(msg.from.to_string());
        participants.insert(msg.to.to_string());
    }
    for msg in &thread.history {
        participants.insert(msg.from.to_string());
        participants.insert(msg.to.to_string());
    }

    let status = if !thread.history.is_empty() {
        ThreadStatus::Completed
    } else if !thread.inbox.is_empty() || !thread.outbox.is_empty() {
        ThreadStatus::Active
    } else {
        ThreadStatus::NotFound
    };

    let mut pending_actions = Vec::new();
    for msg in &thread.inbox {
        if !msg.acknowledged {
            pending_actions.push(format!("acknowledge message from {}", msg.from));
        }
    }
    for msg in &thread.outbox {
        if !msg.completed {
            pending_actions.push(format!("awaiting completion from {}", msg.to));
        }
    }

    let mut participants: Vec<String> = participants.into_iter().collect();
    participants.sort();

    let mut timeline: Vec<TimelineEntry> = Vec::with_capacity(thread.all_count());
    timeline.extend(thread.inbox.iter().map(|msg| TimelineEntry {
        at: msg.received_at,
        from: msg.from.to_string(),
        to: msg.to.to_string(),
        subject: msg.subject.clone(),
        kind: TimelineEventKind::Received,
    }));
    timeline.extend(thread.outbox.iter().map(|msg| TimelineEntry {
        at: msg.sent_at,
        from: msg.from.to_string(),
        to: msg.to.to_string(),
        subject: msg.subject.clone(),
        kind: TimelineEventKind::Sent,
    }));
    timeline.extend(thread.history.iter().map(|msg| TimelineEntry {
        at: msg.completed_at,
        from: msg.from.to_string(),
        to: msg.to.to_string(),
        subject: msg.subject.clone(),
        kind: TimelineEventKind::Completed,
    }));
    timeline.sort_by_key(|entry| entry.at);

    ThreadSummary {
        participants,
        message_count: thread.all_count(),
        timeline,
        status,
        pending_actions,
    }
}

/// Flags inbox entries marked `acknowledged` with no `acknowledged_at`
/// timestamp (the two are only ever set together by `MailboxBuilder`, so
/// seeing one without the other means the state was built or merged by
/// something other than `MailboxBuilder::apply`) and any duplicate
/// `message_id` within a single mailbox half, which would mean the same
/// `agent.message.sent` event was folded twice.
pub fn validate_thread_consistency(state: &MailboxState) -> ConsistencyReport {
    let mut inconsistencies = Vec::new();
    let mut orphaned_threads = 0;

    for msg in &state.inbox {
        if msg.acknowledged && msg.acknowledged_at.is_none() {
            orphaned_threads += 1;
            inconsistencies.push(format!(
                "inbox message {} is acknowledged but carries no acknowledged_at",
                msg.event_id
            ));
        }
    }

    let mut seen_inbox_ids = HashSet::new();
    for msg in &state.inbox {
        if !seen_inbox_ids.insert(msg.message_id) {
            inconsistencies.push(format!("duplicate inbox message_id {}", msg.message_id));
        }
    }
    let mut seen_outbox_ids = HashSet::new();
    for msg in &state.outbox {
        if !seen_outbox_ids.insert(msg.message_id) {
            inconsistencies.push(format!("duplicate outbox message_id {}", msg.message_id));
        }
    }

    let mut threads: HashSet<Uuid> = HashSet::new();
    threads.extend(state.inbox.iter().map(|msg| msg.event_id));
    threads.extend(state.outbox.iter().map(|msg| msg.event_id));
    threads.extend(state.conversation_history.iter().map(|msg| msg.correlation_id));

    let total_messages = state.inbox.len() + state.outbox.len() + state.conversation_history.len();

    ConsistencyReport {
        valid: inconsistencies.is_empty(),
        inconsistencies,
        thread_statistics: ThreadStatistics {
            total_threads: threads.len(),
            total_messages,
            orphaned_threads,
        },
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
