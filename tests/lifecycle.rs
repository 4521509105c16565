//! Lifecycle phases and the validity gate.

mod common;

use common::{sample_store, standalone_context, MemoryLoader, MemoryStorage, Shared};
use tally::{
    BudgetModel, BudgetStore, DataContext, LifecyclePhase, StandaloneDataContext, Validity,
    WorkingDataContext,
};

fn bare_standalone() -> StandaloneDataContext {
    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(sample_store());
    StandaloneDataContext::new(Box::new(loader), Box::new(storage))
}

#[test]
fn fresh_context_is_uninitialized_and_invalid() {
    let ctx = bare_standalone();
    assert_eq!(ctx.phase(), LifecyclePhase::Uninitialized);
    assert!(!ctx.valid());
    assert!(!ctx.initialized());

    // Reads fail soft, validators fail closed.
    assert!(ctx.institution().is_none());
    assert!(ctx.workbook().is_none());
    assert!(!ctx.validate_institution_key("boa"));
    assert!(!ctx.validate_workflow_purpose("working"));
}

#[test]
fn operations_before_initialize_are_state_errors() {
    let mut ctx = bare_standalone();
    let err = ctx.content_get("a", true).unwrap_err();
    assert!(matches!(err, tally::ContextError::State(_)));
    let err = ctx.workbook_remove(0).unwrap_err();
    assert!(matches!(err, tally::ContextError::State(_)));
}

#[test]
fn initialize_without_store_stays_initializing_and_optimistic() {
    let storage = MemoryStorage::new();
    let loader = Shared::new(MemoryLoader::default());
    let mut ctx = StandaloneDataContext::new(Box::new(loader), Box::new(storage));
    ctx.initialize().unwrap();

    assert_eq!(ctx.phase(), LifecyclePhase::Initializing);
    assert_eq!(ctx.validity(), Validity::Initializing);
    assert!(ctx.valid());
    assert!(!ctx.initialized());

    // Optimistic window: validators report valid so bootstrap can proceed.
    assert!(ctx.validate_institution_key("anything"));
    assert!(ctx.validate_workbook_index(99));
}

#[test]
fn initialize_seeds_selection_from_store_defaults() {
    let (ctx, _storage, _loader) = standalone_context();
    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    assert_eq!(ctx.validity(), Validity::Ready);
    assert_eq!(ctx.institution_key(), Some("boa"));
    assert_eq!(ctx.workflow_key(), Some("intake"));
    assert_eq!(ctx.workflow_purpose(), Some(tally::WorkflowPurpose::Working));
}

#[test]
fn unresolvable_store_defaults_are_skipped() {
    let mut store = sample_store();
    store.data_context.fi_key = Some("ghost".to_string());
    store.data_context.wf_key = Some("ghost_flow".to_string());

    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(store.clone());
    let mut ctx =
        StandaloneDataContext::new(Box::new(loader), Box::new(storage)).with_store(store);
    ctx.initialize().unwrap();

    // No resolvable institution default: the context stays initializing.
    assert_eq!(ctx.phase(), LifecyclePhase::Initializing);
    assert!(ctx.workflow_key().is_none());
}

#[test]
fn load_store_transitions_to_ready() {
    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(sample_store());
    let mut ctx =
        StandaloneDataContext::new(Box::new(loader.clone()), Box::new(storage));

    ctx.load_store("mem://budget_store.json").unwrap();
    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    assert_eq!(ctx.institution_key(), Some("boa"));
    assert!(!ctx.store_changed());
}

#[test]
fn mark_initialized_forces_ready_but_gate_still_judges() {
    let storage = MemoryStorage::new();
    let loader = Shared::new(MemoryLoader::default());
    let mut ctx = StandaloneDataContext::new(Box::new(loader), Box::new(storage));
    ctx.initialize().unwrap();
    ctx.mark_initialized();

    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    // Placeholder store, no institution selected: ready but not valid.
    assert_eq!(
        ctx.validity(),
        Validity::Invalid("no institution is selected")
    );
    assert!(!ctx.valid());
}

#[test]
fn selection_completes_readiness_during_initialization() {
    let mut store = sample_store();
    store.data_context.fi_key = None;

    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(store.clone());
    let mut ctx =
        StandaloneDataContext::new(Box::new(loader), Box::new(storage)).with_store(store);
    ctx.initialize().unwrap();
    assert_eq!(ctx.phase(), LifecyclePhase::Initializing);

    ctx.set_institution_key("boa").unwrap();
    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    assert!(ctx.valid());
}

#[test]
fn working_context_initializes_from_model_defaults() {
    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(sample_store());
    let model = BudgetModel::new(sample_store(), Box::new(loader));
    let mut ctx = WorkingDataContext::new(model, Box::new(storage));

    ctx.initialize().unwrap();
    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    assert_eq!(ctx.institution_key(), Some("boa"));
}

#[test]
fn working_context_without_defaults_stays_initializing() {
    let mut store = sample_store();
    store.data_context = Default::default();

    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(store.clone());
    let model = BudgetModel::new(store, Box::new(loader));
    let mut ctx = WorkingDataContext::new(model, Box::new(storage));

    ctx.initialize().unwrap();
    assert_eq!(ctx.phase(), LifecyclePhase::Initializing);
    assert!(ctx.valid());
}

#[test]
fn ready_context_with_missing_institution_is_invalid() {
    let (mut ctx, _storage, _loader) = standalone_context();
    ctx.store_mut().unwrap().institutions.remove("boa");
    assert_eq!(
        ctx.validity(),
        Validity::Invalid("selected institution is missing from the store")
    );
    assert!(ctx.institution().is_none());
}

#[test]
fn placeholder_store_is_adopted_before_a_real_document() {
    let storage = MemoryStorage::new();
    let loader = Shared::new(MemoryLoader::default());
    let mut ctx = StandaloneDataContext::new(Box::new(loader), Box::new(storage));
    assert!(ctx.store().is_none());

    ctx.initialize().unwrap();
    let store: &BudgetStore = ctx.store().unwrap();
    assert!(store.institutions.is_empty());
}
