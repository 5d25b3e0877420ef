use super::*;
use chrono::Utc;
use jc_core::{AgentId, Priority};

fn inbox_msg(event_id: Uuid, from: &str, to: &str, acknowledged: bool) -> InboxMessage {
    InboxMessage {
        event_id,
        message_id: Uuid::new_v4(),
        from: AgentId::new(from),
        to: AgentId::new(to),
        subject: "subject".into(),
        body: "body".into(),
        priority: Priority::Normal,
        created_at: Utc::now(),
        received_at: Utc::now(),
        acknowledged,
        acknowledged_at: acknowledged.then(Utc::now),
        correlation_id: None,
    }
}

#[test]
fn thread_lookup_by_sent_event_id_finds_inbox_entry() {
    let cid = Uuid::new_v4();
    let mut state = MailboxState::default();
    state.inbox.push(inbox_msg(cid, "agent-a", "agent-b", false));

    let thread = get_messages_by_correlation_id(&state, cid);
    assert_eq!(thread.inbox.len(), 1);
    assert_eq!(thread.all_count(), 1);
}

#[test]
fn thread_summary_reports_active_with_unacknowledged_message() {
    let cid = Uuid::new_v4();
    let mut state = MailboxState::default();
    state.inbox.push(inbox_msg(cid, "agent-a", "agent-b", false));

    let summary = get_thread_summary(&state, cid);
    assert_eq!(summary.status, ThreadStatus::Active);
    assert_eq!(summary.participants, vec!["agent-a".to_string(), "agent-b".to_string()]);
    assert_eq!(summary.pending_actions.len(), 1);
    assert_eq!(summary.timeline.len(), 1);
    assert_eq!(summary.timeline[0].kind, TimelineEventKind::Received);
}

#[test]
fn thread_summary_reports_not_found_for_unknown_correlation_id() {
    let state = MailboxState::default();
    let summary = get_thread_summary(&state, Uuid::new_v4());
    assert_eq!(summary.status, ThreadStatus::NotFound);
    assert!(summary.participants.is_empty());
}

#[test]
fn thread_summary_reports_completed_once_history_exists() {
    let cid = Uuid::new_v4();
    let mut state = MailboxState::default();
    state.conversation_history.push(ConversationMessage {
        correlation_id: cid,
        from: AgentId::new("agent-a"),
        to: AgentId::new("agent-b"),
        subject: "subject".into(),
        body: "body".into(),
        success: true,
        completed_at: Utc::now(),
    });

    let summary = get_thread_summary(&state, cid);
    assert_eq!(summary.status, ThreadStatus::Completed);
    assert_eq!(summary.timeline.len(), 1);
    assert_eq!(summary.timeline[0].kind, TimelineEventKind::Completed);
}

#[test]
fn thread_summary_orders_timeline_chronologically_across_inbox_outbox_and_history() {
    let cid = Uuid::new_v4();
    let mut state = MailboxState::default();
    let earliest = Utc::now() - chrono::Duration::minutes(10);
    let middle = Utc::now() - chrono::Duration::minutes(5);
    let latest = Utc::now();

    let mut received = inbox_msg(cid, "agent-a", "agent-b", false);
    received.received_at = middle;
    state.inbox.push(received);

    state.outbox.push(OutboxMessage {
        event_id: cid,
        message_id: Uuid::new_v4(),
        from: AgentId::new("agent-b"),
        to: AgentId::new("agent-a"),
        subject: "subject".into(),
        body: "body".into(),
        priority: Priority::Normal,
        created_at: earliest,
        sent_at: earliest,
        completed: true,
        completed_at: Some(latest),
        success: Some(true),
    });

    state.conversation_history.push(ConversationMessage {
        correlation_id: cid,
        from: AgentId::new("agent-b"),
        to: AgentId::new("agent-a"),
        subject: "subject".into(),
        body: "body".into(),
        success: true,
        completed_at: latest,
    });

    let summary = get_thread_summary(&state, cid);
    assert_eq!(summary.timeline.len(), 3);
    assert_eq!(summary.timeline[0].kind, TimelineEventKind::Sent);
    assert_eq!(summary.timeline[1].kind, TimelineEventKind::Received);
    assert_eq!(summary.timeline[2].at, latest);
}

#[test]
fn consistency_check_passes_for_well_formed_state() {
    let mut state = MailboxState::default();
    state.inbox.push(inbox_msg(Uuid::new_v4(), "agent-a", "agent-b", true));

    let report = validate_thread_consistency(&state);
    assert!(report.valid);
    assert!(report.inconsistencies.is_empty());
    assert_eq!(report.thread_statistics.total_messages, 1);
}

#[test]
fn consistency_check_flags_acknowledged_without_timestamp() {
    let mut state = MailboxState::default();
    let mut msg = inbox_msg(Uuid::new_v4(), "agent-a", "agent-b", true);
    msg.acknowledged_at = None;
    state.inbox.push(msg);

    let report = validate_thread_consistency(&state);
    assert!(!report.valid);
    assert_eq!(report.thread_statistics.orphaned_threads, 1);
}

#[test]
fn consistency_check_flags_duplicate_message_ids() {
    let mut state = MailboxState::default();
    let shared_id = Uuid::new_v4();
    let mut first = inbox_msg(Uuid::new_v4(), "agent-a", "agent-b", false);
    first.message_id = shared_id;
    let mut second = inbox_msg(Uuid::new_v4(), "agent-a", "agent-b", false);
    second.message_id = shared_id;
    state.inbox.push(first);
    state.inbox.push(second);

    let report = validate_thread_consistency(&state);
    assert!(!report.valid);
    assert!(report
        .inconsistencies
        .iter()
        .any(|msg| msg.contains("duplicate inbox message_id")));
}
