use super::*;
use jc_core::FakeClock;

fn store() -> EventStore<FakeClock> {
    EventStore::open_in_memory_with_clock(FakeClock::new()).expect("in-memory store opens")
}

#[test]
fn start_sets_planning_phase() {
    let store = store();
    let facade = WorkflowFacade::start(&store, WorkflowId::new("wf-1"), None, Some("PROJ-1".into())).unwrap();
    assert_eq!(facade.state().phase, Phase::Planning);
}

#[test]
fn start_rejects_invalid_task_id() {
    let store = store();
    let err = WorkflowFacade::start(&store, WorkflowId::new("wf-2"), None, Some("not valid!!".into())).unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTaskId(_)));
}

#[test]
fn invalid_phase_transition_is_rejected_and_emits_nothing() {
    let store = store();
    let mut facade = WorkflowFacade::start(&store, WorkflowId::new("wf-3"), None, None).unwrap();
    let err = facade.transition_phase(Phase::Complete).unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidPhaseTransition { .. }));
    assert_eq!(facade.state().phase, Phase::Planning);
    assert!(store
        .get_events(&WorkflowId::new("wf-3"), None, jc_store::EventOrder::Asc, None, None)
        .unwrap()
        .iter()
        .all(|record| record.data.event_type() != "phase.changed"));
}

#[test]
fn valid_phase_transition_advances_state() {
    let store = store();
    let mut facade = WorkflowFacade::start(&store, WorkflowId::new("wf-4"), None, None).unwrap();
    facade.transition_phase(Phase::Implementing).unwrap();
    assert_eq!(facade.state().phase, Phase::Implementing);
}

#[test]
fn feature_operation_before_planning_fails() {
    let store = store();
    let mut facade = WorkflowFacade::start(&store, WorkflowId::new("wf-5"), None, None).unwrap();
    let name = FeatureName::new("auth");
    let err = facade.start_feature(&name).unwrap_err();
    assert!(matches!(err, WorkflowError::FeatureNotPlanned(_)));
}

#[test]
fn completing_a_feature_advances_index_and_count() {
    let store = store();
    let mut facade = WorkflowFacade::start(&store, WorkflowId::new("wf-6"), None, None).unwrap();
    let name = FeatureName::new("auth");
    facade.plan_feature(name.clone(), "add auth".into(), None).unwrap();
    facade.start_feature(&name).unwrap();
    facade.complete_feature(&name, Some(true), Some(500)).unwrap();
    assert_eq!(facade.state().current_feature_index, 1);
    assert_eq!(facade.state().completed_count(), 1);
}

#[test]
fn complete_workflow_requires_implementing_or_verifying_phase() {
    let store = store();
    let mut facade = WorkflowFacade::start(&store, WorkflowId::new("wf-7"), None, None).unwrap();
    let err = facade.complete_workflow(None, None).unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidPhaseTransition { .. }));

    facade.transition_phase(Phase::Implementing).unwrap();
    facade.complete_workflow(Some(1_000), Some(0.2)).unwrap();
    assert_eq!(facade.state().phase, Phase::Complete);
}

#[test]
fn load_replays_a_facade_started_elsewhere() {
    let store = store();
    let workflow_id = WorkflowId::new("wf-8");
    {
        let mut facade = WorkflowFacade::start(&store, workflow_id.clone(), None, None).unwrap();
        facade.transition_phase(Phase::Implementing).unwrap();
    }
    let loaded = WorkflowFacade::load(&store, workflow_id).unwrap();
    assert_eq!(loaded.state().phase, Phase::Implementing);
}

#[test]
fn unknown_feature_lookup_is_distinguished_from_not_planned() {
    let store = store();
    let facade = WorkflowFacade::start(&store, WorkflowId::new("wf-9"), None, None).unwrap();
    let err = facade.feature(&FeatureName::new("ghost")).unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownFeature(_)));
}
