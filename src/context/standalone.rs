//! Self-contained data context: owns the store document directly.
//!
//! This engine has no model behind it; the store document is the only
//! backing data. It is the implementation of choice for tools and tests
//! that work straight off a loaded store.

use crate::context::contract::DataContext;
use crate::context::engine::EngineCore;
use crate::context::phase::{LifecyclePhase, Validity};
use crate::error::ContextError;
use crate::store::{BudgetStore, Institution, StoreLoader};
use crate::types::{WorkbookContent, WorkflowPurpose};
use crate::workbook::{Workbook, WorkbookAttr, WorkbookCollection, WorkbookStorage};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

/// Self-contained implementation of [`DataContext`].
pub struct StandaloneDataContext {
    core: EngineCore,
    store: Option<BudgetStore>,
    loader: Box<dyn StoreLoader>,
}

impl fmt::Debug for StandaloneDataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandaloneDataContext")
            .field("dc_id", &self.core.state.dc_id)
            .field("phase", &self.core.state.phase)
            .field("fi_key", &self.core.state.fi_key)
            .finish_non_exhaustive()
    }
}

impl StandaloneDataContext {
    pub fn new(loader: Box<dyn StoreLoader>, storage: Box<dyn WorkbookStorage>) -> Self {
        StandaloneDataContext {
            core: EngineCore::new("StandaloneDataContext", storage),
            store: None,
            loader,
        }
    }

    pub fn with_dc_id(mut self, dc_id: impl Into<String>) -> Self {
        self.core.state.dc_id = dc_id.into();
        self
    }

    /// Inject a store document directly; primarily for construction in
    /// tests and bootstrap code that already holds the document.
    pub fn with_store(mut self, store: BudgetStore) -> Self {
        self.store = Some(store);
        self
    }
}

impl DataContext for StandaloneDataContext {
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
        self.core.state.validity(self.store.as_ref())
    }

    fn initialize(&mut self) -> Result<(), ContextError> {
        if self.core.state.phase == LifecyclePhase::Uninitialized {
            self.core.state.phase = LifecyclePhase::Initializing;
        }
        // Placeholder document until a real one arrives; never a
        // constructed-from-scratch store of record.
        if self.store.is_none() {
            self.store = Some(BudgetStore::placeholder());
        }
        if let Some(store) = self.store.as_ref() {
            self.core.state.seed_defaults(store);
        }
        self.core.state.maybe_ready(self.store.as_ref());
        debug!(dc_id = %self.core.state.dc_id, phase = %self.core.state.phase,
            "standalone context initialized");
        Ok(())
    }

    fn mark_initialized(&mut self) {
        self.core.state.phase = LifecyclePhase::Ready;
    }

    fn store(&self) -> Option<&BudgetStore> {
        self.store.as_ref()
    }

    fn store_mut(&mut self) -> Option<&mut BudgetStore> {
        self.store.as_mut()
    }

    fn set_store(&mut self, store: BudgetStore) {
        self.store = Some(store);
    }

    fn store_changed(&self) -> bool {
        self.core.state.store_changed
    }

    fn set_store_changed(&mut self, changed: bool) {
        self.core.state.store_changed = changed;
    }

    fn load_store(&mut self, url: &str) -> Result<(), ContextError> {
        let store = self.loader.load_store(url)?;
        self.store = Some(store);
        if self.core.state.phase == LifecyclePhase::Uninitialized {
            self.core.state.phase = LifecyclePhase::Initializing;
        }
        if let Some(store) = self.store.as_ref() {
            self.core.state.seed_defaults(store);
        }
        self.core.state.store_changed = false;
        self.core.state.maybe_ready(self.store.as_ref());
        Ok(())
    }

    fn save_store(&mut self, url: &str) -> Result<(), ContextError> {
        let Some(store) = self.store.as_mut() else {
            warn!(op = "save_store", url, "store is not set");
            return Err(ContextError::State(
                "save_store: store is not set".to_string(),
            ));
        };
        store.touch(&self.core.state.dc_id);
        self.loader.save_store(store, url)?;
        self.core.state.store_changed = false;
        Ok(())
    }

    fn institution(&self) -> Option<&Institution> {
        self.core.state.institution(self.store.as_ref())
    }

    fn set_institution_key(&mut self, fi_key: &str) -> Result<(), ContextError> {
        self.core.state.select_institution(self.store.as_ref(), fi_key)
    }

    fn workflow_key(&self) -> Option<&str> {
        self.core.state.wf_key.as_deref()
    }

    fn set_workflow_key(&mut self, wf_key: &str) -> Result<(), ContextError> {
        self.core.state.select_workflow(self.store.as_ref(), wf_key)
    }

    fn workflow_purpose(&self) -> Option<WorkflowPurpose> {
        self.core.state.wf_purpose
    }

    fn set_workflow_purpose(&mut self, purpose: WorkflowPurpose) {
        self.core.state.wf_purpose = Some(purpose);
    }

    fn workbook(&self) -> Option<&Workbook> {
        self.core.state.workbook(self.store.as_ref())
    }

    fn set_workbook(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.core.state.select_workbook(self.store.as_ref(), wb_id)
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
        self.core.validate_institution_key(self.store.as_ref(), fi_key)
    }

    fn validate_workflow_key(&self, wf_key: &str) -> bool {
        self.core.validate_workflow_key(self.store.as_ref(), wf_key)
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
        self.core.validate_workbook_id(self.store.as_ref(), wb_id)
    }

    fn validate_workbook_index(&self, index: usize) -> bool {
        self.core.validate_workbook_index(self.store.as_ref(), index)
    }

    fn workbooks(&self) -> Option<&WorkbookCollection> {
        self.core.state.collection(self.store.as_ref())
    }

    fn workbook_by_id(&self, wb_id: &str) -> Option<&Workbook> {
        self.workbooks()?.get(wb_id)
    }

    fn workbook_by_index(&self, index: usize) -> Option<&Workbook> {
        self.core.workbook_by_index(self.store.as_ref(), index)
    }

    fn workbook_index_of(&self, wb_id: &str) -> Option<usize> {
        self.core.workbook_index_of(self.store.as_ref(), wb_id)
    }

    fn workbook_find(&self, attr: WorkbookAttr, value: &str) -> Option<&Workbook> {
        self.core.workbook_find(self.store.as_ref(), attr, value)
    }

    fn workbook_add(&mut self, workbook: Workbook) -> Result<(), ContextError> {
        self.core.workbook_add(self.store.as_mut(), workbook)
    }

    fn workbook_remove(&mut self, index: usize) -> Result<Workbook, ContextError> {
        self.core.workbook_remove(self.store.as_mut(), index)
    }

    fn workbook_loaded(&self, wb_id: &str) -> bool {
        self.core.workbook_loaded(self.store.as_ref(), wb_id)
    }

    fn purpose_folder(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<String> {
        self.core.purpose_folder(self.store.as_ref(), wf_key, purpose)
    }

    fn purpose_folder_path(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<PathBuf> {
        self.core
            .purpose_folder_path(self.store.as_ref(), wf_key, purpose)
    }

    fn content_get(
        &mut self,
        wb_id: &str,
        force_load: bool,
    ) -> Result<&WorkbookContent, ContextError> {
        self.core.content_get(self.store.as_mut(), wb_id, force_load)
    }

    fn content_put(&mut self, content: WorkbookContent, wb_id: &str) -> Result<(), ContextError> {
        self.core.content_put(self.store.as_mut(), content, wb_id)
    }

    fn content_evict(&mut self, wb_id: &str) -> bool {
        self.core.cache.evict(wb_id)
    }

    fn workbook_load(&mut self, wb_id: &str) -> Result<&WorkbookContent, ContextError> {
        self.core.content_get(self.store.as_mut(), wb_id, true)
    }

    fn workbook_save(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.core.workbook_save(self.store.as_mut(), wb_id)
    }

    fn category_service(&self) -> Option<Rc<dyn Any>> {
        self.core.category_service.clone()
    }

    fn set_category_service(&mut self, service: Rc<dyn Any>) {
        self.core.category_service = Some(service);
    }
}
