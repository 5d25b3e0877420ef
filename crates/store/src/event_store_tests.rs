use super::*;
use jc_core::event::AgentNoteFields;
use jc_core::{Event, FakeClock};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

fn store() -> EventStore<FakeClock> {
    EventStore::open_in_memory_with_clock(FakeClock::new()).expect("in-memory store opens")
}

fn started() -> Event {
    Event::WorkflowStarted {
        description: Some("initial run".to_string()),
        beads_task_id: Some("PROJ-1".to_string()),
    }
}

fn phase_changed() -> Event {
    Event::PhaseChanged {
        from_phase: Some("planning".to_string()),
        to_phase: "building".to_string(),
    }
}

#[test]
fn append_assigns_monotonic_sequence_numbers() {
    let store = store();
    let wf = WorkflowId::new("wf-1");
    let a = store.append(&wf, started()).unwrap();
    let b = store
        .append(
            &wf,
            phase_changed(),
        )
        .unwrap();
    assert!(b.sequence_number > a.sequence_number);
}

#[test]
fn append_rejects_empty_workflow_id() {
    let store = store();
    let err = store.append(&WorkflowId::new(""), started()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[test]
fn get_events_round_trips_data() {
    let store = store();
    let wf = WorkflowId::new("wf-2");
    store.append(&wf, started()).unwrap();
    let events = store
        .get_events(&wf, None, EventOrder::Asc, None, None)
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, started());
    assert_eq!(events[0].workflow_id, wf);
}

#[test]
fn get_events_filters_by_event_type() {
    let store = store();
    let wf = WorkflowId::new("wf-3");
    store.append(&wf, started()).unwrap();
    store
        .append(
            &wf,
            phase_changed(),
        )
        .unwrap();
    let events = store
        .get_events(&wf, Some("workflow.started"), EventOrder::Asc, None, None)
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data.event_type(), "workflow.started");
}

#[test]
fn get_events_respects_descending_order() {
    let store = store();
    let wf = WorkflowId::new("wf-4");
    store.append(&wf, started()).unwrap();
    store
        .append(
            &wf,
            phase_changed(),
        )
        .unwrap();
    let events = store
        .get_events(&wf, None, EventOrder::Desc, None, None)
        .unwrap();
    assert_eq!(events[0].data.event_type(), "phase.changed");
}

#[test]
fn append_batch_is_all_or_nothing() {
    let store = store();
    let wf = WorkflowId::new("wf-5");
    let result = store.append_batch(&wf, vec![started(), Event::Custom]);
    assert!(result.is_err());
    let events = store.get_events(&wf, None, EventOrder::Asc, None, None).unwrap();
    assert!(events.is_empty());
}

#[test]
fn append_batch_commits_all_events_in_order() {
    let store = store();
    let wf = WorkflowId::new("wf-6");
    let records = store
        .append_batch(
            &wf,
            vec![
                started(),
                phase_changed(),
            ],
        )
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[1].sequence_number > records[0].sequence_number);
}

#[test]
fn snapshot_save_and_get_round_trips() {
    let store = store();
    let wf = WorkflowId::new("wf-7");
    let snapshot = Snapshot {
        workflow_id: wf.clone(),
        sequence_number: 5,
        state: serde_json::json!({"phase": "building"}),
        created_at: chrono::Utc::now(),
    };
    store.save_snapshot(&snapshot).unwrap();
    let loaded = store.get_snapshot(&wf).unwrap().unwrap();
    assert_eq!(loaded.sequence_number, 5);
    assert_eq!(loaded.state, serde_json::json!({"phase": "building"}));
}

#[test]
fn snapshot_save_is_idempotent_upsert() {
    let store = store();
    let wf = WorkflowId::new("wf-8");
    for seq in [1, 2, 3] {
        store
            .save_snapshot(&Snapshot {
                workflow_id: wf.clone(),
                sequence_number: seq,
                state: serde_json::json!({"seq": seq}),
                created_at: chrono::Utc::now(),
            })
            .unwrap();
    }
    let loaded = store.get_snapshot(&wf).unwrap().unwrap();
    assert_eq!(loaded.sequence_number, 3);
}

#[test]
fn get_snapshot_returns_none_when_absent() {
    let store = store();
    let wf = WorkflowId::new("wf-9");
    assert!(store.get_snapshot(&wf).unwrap().is_none());
}

#[test]
fn auto_snapshot_triggers_at_interval() {
    let store = store();
    let wf = WorkflowId::new("wf-10");
    for i in 0..AUTO_SNAPSHOT_INTERVAL {
        store
            .append(
                &wf,
                Event::AgentNoteContext {
                    note: AgentNoteFields {
                        agent: "agent-a".into(),
                        title: format!("note {i}"),
                        content: "filler".into(),
                        tags: vec![],
                        related_file: None,
                        related_feature: None,
                    },
                },
            )
            .unwrap();
    }
    let snapshot = store.get_snapshot(&wf).unwrap();
    assert!(snapshot.is_some());
}

#[test]
fn subscribers_are_notified_in_commit_order() {
    let store = store();
    let wf = WorkflowId::new("wf-11");
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    store.subscribe(move |record| {
        seen_clone.lock().push(record.data.event_type().to_string());
    });
    store.append(&wf, started()).unwrap();
    store
        .append(
            &wf,
            phase_changed(),
        )
        .unwrap();
    assert_eq!(*seen.lock(), vec!["workflow.started", "phase.changed"]);
}

#[test]
fn unsubscribe_stops_future_notifications() {
    let store = store();
    let wf = WorkflowId::new("wf-12");
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    let id = store.subscribe(move |_| {
        count_clone.fetch_add(1, AtomicOrdering::Relaxed);
    });
    store.append(&wf, started()).unwrap();
    assert!(store.unsubscribe(id));
    store
        .append(
            &wf,
            phase_changed(),
        )
        .unwrap();
    assert_eq!(count.load(AtomicOrdering::Relaxed), 1);
}

#[test]
fn panicking_subscriber_does_not_break_append() {
    let store = store();
    let wf = WorkflowId::new("wf-13");
    store.subscribe(|_| panic!("boom"));
    let record = store.append(&wf, started()).unwrap();
    assert_eq!(record.data.event_type(), "workflow.started");
}
