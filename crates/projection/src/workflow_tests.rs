use super::*;
use crate::test_support::record;
use jc_core::id::FeatureName;

fn fold(events: Vec<Event>) -> WorkflowState {
    let builder = WorkflowBuilder;
    events
        .into_iter()
        .map(record)
        .try_fold(builder.initial_state(), |state, rec| builder.apply(state, &rec))
        .unwrap()
}

#[test]
fn full_workflow_replay_reaches_complete_with_one_feature() {
    let events = vec![
        Event::WorkflowStarted {
            description: None,
            beads_task_id: Some("PROJ-1".into()),
        },
        Event::WorktreeCreated {
            path: "/t/W".into(),
            branch: "f/W".into(),
            base_commit: None,
        },
        Event::FeaturePlanned {
            name: FeatureName::new("auth"),
            description: "add auth".into(),
            test_file: None,
        },
        Event::FeatureStarted {
            name: FeatureName::new("auth"),
        },
        Event::TestsPassed {
            test_file: "auth_test.rs".into(),
            feature: Some(FeatureName::new("auth")),
            count: Some(3),
            duration_ms: None,
        },
        Event::CommitCreated {
            commit_sha: "abc".into(),
            message: "add auth".into(),
            files: vec![],
        },
        Event::FeatureCompleted {
            name: FeatureName::new("auth"),
            tests_passing: Some(true),
            duration_ms: Some(1_000),
        },
        Event::WorkflowCompleted {
            duration_ms: Some(1_000),
            total_cost: Some(0.1),
        },
    ];
    let state = fold(events);
    assert_eq!(state.phase, Phase::Complete);
    assert_eq!(state.features.len(), 1);
    assert_eq!(state.features[0].status, FeatureStatus::Completed);
    assert!(state.features[0].tests_passing);
    assert!(state.is_complete());
    assert_eq!(state.commits, vec!["abc".to_string()]);
}

#[test]
fn feature_failure_is_reflected_without_completing() {
    let events = vec![
        Event::WorkflowStarted {
            description: None,
            beads_task_id: None,
        },
        Event::FeaturePlanned {
            name: FeatureName::new("auth"),
            description: "add auth".into(),
            test_file: None,
        },
        Event::FeatureFailed {
            name: FeatureName::new("auth"),
            error: Some("boom".into()),
        },
    ];
    let state = fold(events);
    assert!(state.is_failed());
    assert!(!state.is_complete());
}

#[test]
fn unknown_event_type_is_rejected() {
    let builder = WorkflowBuilder;
    let result = builder.apply(builder.initial_state(), &record(Event::Custom));
    assert!(result.is_err());
}

#[test]
fn progress_percentage_is_zero_with_no_features() {
    let state = WorkflowBuilder.initial_state();
    assert_eq!(state.progress_percentage(), 0.0);
}

#[test]
fn progress_percentage_reflects_completed_fraction() {
    let events = vec![
        Event::FeaturePlanned {
            name: FeatureName::new("a"),
            description: "d".into(),
            test_file: None,
        },
        Event::FeaturePlanned {
            name: FeatureName::new("b"),
            description: "d".into(),
            test_file: None,
        },
        Event::FeatureCompleted {
            name: FeatureName::new("a"),
            tests_passing: Some(true),
            duration_ms: None,
        },
    ];
    let state = fold(events);
    assert_eq!(state.progress_percentage(), 0.5);
}
