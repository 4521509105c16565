//! Store-bound data context: derives its data from a budget model.
//!
//! The working context is the bridge an application wires between its view
//! model and the domain model. It implements the same contract as the
//! self-contained engine but owns no store of its own — every store read
//! goes through the model, so external mutations of the model's document
//! are observed on the next access.

use crate::context::contract::DataContext;
use crate::context::engine::EngineCore;
use crate::context::phase::{LifecyclePhase, Validity};
use crate::error::ContextError;
use crate::model::BudgetModel;
use crate::store::{BudgetStore, Institution};
use crate::types::{WorkbookContent, WorkflowPurpose};
use crate::workbook::{Workbook, WorkbookAttr, WorkbookCollection, WorkbookStorage};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

/// Store-bound implementation of [`DataContext`], backed by a
/// [`BudgetModel`].
pub struct WorkingDataContext {
    core: EngineCore,
    model: BudgetModel,
}

impl fmt::Debug for WorkingDataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingDataContext")
            .field("dc_id", &self.core.state.dc_id)
            .field("phase", &self.core.state.phase)
            .field("fi_key", &self.core.state.fi_key)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl WorkingDataContext {
    pub fn new(model: BudgetModel, storage: Box<dyn WorkbookStorage>) -> Self {
        WorkingDataContext {
            core: EngineCore::new("WorkingDataContext", storage),
            model,
        }
    }

    pub fn with_dc_id(mut self, dc_id: impl Into<String>) -> Self {
        self.core.state.dc_id = dc_id.into();
        self
    }

    /// The backing model binding.
    pub fn model(&self) -> &BudgetModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut BudgetModel {
        &mut self.model
    }
}

impl DataContext for WorkingDataContext {
    fn dc_id(&self) -> &str {
        &self.core.state.dc_id
    }

    fn set_dc_id(&mut self, dc_id: String) {
        self.core.state.dc_id = dc_id;
    }

    fn phase(&self) -> LifecyclePhase {
        self.core.state.phase
    }

    fn validity(&self) -> Validity {
        self.core.state.validity(Some(self.model.store()))
    }

    fn initialize(&mut self) -> Result<(), ContextError> {
        if !self.model.initialized() {
            return Err(ContextError::Configuration(
                "initialize: budget model binding is not initialized".to_string(),
            ));
        }
        if self.core.state.phase == LifecyclePhase::Uninitialized {
            self.core.state.phase = LifecyclePhase::Initializing;
        }
        self.core.state.seed_defaults(self.model.store());
        self.core.state.maybe_ready(Some(self.model.store()));
        if self.core.state.phase != LifecyclePhase::Ready {
            warn!(dc_id = %self.core.state.dc_id,
                "no resolvable default institution; context stays initializing");
        }
        debug!(dc_id = %self.core.state.dc_id, phase = %self.core.state.phase,
            "working context initialized");
        Ok(())
    }

    fn mark_initialized(&mut self) {
        self.core.state.phase = LifecyclePhase::Ready;
    }

    fn store(&self) -> Option<&BudgetStore> {
        Some(self.model.store())
    }

    fn store_mut(&mut self) -> Option<&mut BudgetStore> {
        Some(self.model.store_mut())
    }

    fn set_store(&mut self, store: BudgetStore) {
        self.model.replace_store(store);
    }

    fn store_changed(&self) -> bool {
        self.core.state.store_changed
    }

    fn set_store_changed(&mut self, changed: bool) {
        self.core.state.store_changed = changed;
    }

    fn load_store(&mut self, url: &str) -> Result<(), ContextError> {
        self.model.reload_from(url)?;
        if self.core.state.phase == LifecyclePhase::Uninitialized {
            self.core.state.phase = LifecyclePhase::Initializing;
        }
        self.core.state.seed_defaults(self.model.store());
        self.core.state.store_changed = false;
        self.core.state.maybe_ready(Some(self.model.store()));
        Ok(())
    }

    fn save_store(&mut self, url: &str) -> Result<(), ContextError> {
        let dc_id = self.core.state.dc_id.clone();
        self.model.save(Some(url), &dc_id)?;
        self.core.state.store_changed = false;
        Ok(())
    }

    fn institution(&self) -> Option<&Institution> {
        self.core.state.institution(Some(self.model.store()))
    }

    fn set_institution_key(&mut self, fi_key: &str) -> Result<(), ContextError> {
        self.core
            .state
            .select_institution(Some(self.model.store()), fi_key)
    }

    fn workflow_key(&self) -> Option<&str> {
        self.core.state.wf_key.as_deref()
    }

    fn set_workflow_key(&mut self, wf_key: &str) -> Result<(), ContextError> {
        self.core
            .state
            .select_workflow(Some(self.model.store()), wf_key)
    }

    fn workflow_purpose(&self) -> Option<WorkflowPurpose> {
        self.core.state.wf_purpose
    }

    fn set_workflow_purpose(&mut self, purpose: WorkflowPurpose) {
        self.core.state.wf_purpose = Some(purpose);
    }

    fn workbook(&self) -> Option<&Workbook> {
        self.core.state.workbook(Some(self.model.store()))
    }

    fn set_workbook(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.core
            .state
            .select_workbook(Some(self.model.store()), wb_id)
    }

    fn clear_workbook(&mut self) {
        self.core.state.wb_id = None;
    }

    fn all_workbooks(&self) -> bool {
        self.core.state.all_workbooks
    }

    fn set_all_workbooks(&mut self, all: bool) {
        self.core.state.all_workbooks = all;
    }

    fn validate_institution_key(&self, fi_key: &str) -> bool {
        self.core
            .validate_institution_key(Some(self.model.store()), fi_key)
    }

    fn validate_workflow_key(&self, wf_key: &str) -> bool {
        self.core
            .validate_workflow_key(Some(self.model.store()), wf_key)
    }

    fn validate_workflow_purpose(&self, candidate: &str) -> bool {
        self.core.validate_workflow_purpose(candidate)
    }

    fn validate_workbook_type(&self, candidate: &str) -> bool {
        self.core.validate_workbook_type(candidate)
    }

    fn validate_workbook_name(&self, candidate: &str) -> bool {
        self.core.validate_workbook_name(candidate)
    }

    fn validate_workbook_id(&self, wb_id: &str) -> bool {
        self.core
            .validate_workbook_id(Some(self.model.store()), wb_id)
    }

    fn validate_workbook_index(&self, index: usize) -> bool {
        self.core
            .validate_workbook_index(Some(self.model.store()), index)
    }

    fn workbooks(&self) -> Option<&WorkbookCollection> {
        self.core.state.collection(Some(self.model.store()))
    }

    fn workbook_by_id(&self, wb_id: &str) -> Option<&Workbook> {
        self.workbooks()?.get(wb_id)
    }

    fn workbook_by_index(&self, index: usize) -> Option<&Workbook> {
        self.core.workbook_by_index(Some(self.model.store()), index)
    }

    fn workbook_index_of(&self, wb_id: &str) -> Option<usize> {
        self.core.workbook_index_of(Some(self.model.store()), wb_id)
    }

    fn workbook_find(&self, attr: WorkbookAttr, value: &str) -> Option<&Workbook> {
        self.core
            .workbook_find(Some(self.model.store()), attr, value)
    }

    fn workbook_add(&mut self, workbook: Workbook) -> Result<(), ContextError> {
        self.core
            .workbook_add(Some(self.model.store_mut()), workbook)
    }

    fn workbook_remove(&mut self, index: usize) -> Result<Workbook, ContextError> {
        self.core.workbook_remove(Some(self.model.store_mut()), index)
    }

    fn workbook_loaded(&self, wb_id: &str) -> bool {
        self.core.workbook_loaded(Some(self.model.store()), wb_id)
    }

    fn purpose_folder(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<String> {
        self.core
            .purpose_folder(Some(self.model.store()), wf_key, purpose)
    }

    fn purpose_folder_path(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<PathBuf> {
        self.core
            .purpose_folder_path(Some(self.model.store()), wf_key, purpose)
    }

    fn content_get(
        &mut self,
        wb_id: &str,
        force_load: bool,
    ) -> Result<&WorkbookContent, ContextError> {
        self.core
            .content_get(Some(self.model.store_mut()), wb_id, force_load)
    }

    fn content_put(&mut self, content: WorkbookContent, wb_id: &str) -> Result<(), ContextError> {
        self.core
            .content_put(Some(self.model.store_mut()), content, wb_id)
    }

    fn content_evict(&mut self, wb_id: &str) -> bool {
        self.core.cache.evict(wb_id)
    }

    fn workbook_load(&mut self, wb_id: &str) -> Result<&WorkbookContent, ContextError> {
        self.core
            .content_get(Some(self.model.store_mut()), wb_id, true)
    }

    fn workbook_save(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.core.workbook_save(Some(self.model.store_mut()), wb_id)
    }

    fn category_service(&self) -> Option<Rc<dyn Any>> {
        self.core.category_service.clone()
    }

    fn set_category_service(&mut self, service: Rc<dyn Any>) {
        self.core.category_service = Some(service);
    }
}
