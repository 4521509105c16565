//! Binding layer: forwards the whole data context contract to an injected
//! provider.
//!
//! Consumers hold a binding instead of a concrete engine, so they can be
//! wired to either backing strategy without knowing which. Binding a
//! missing or unidentifiable provider fails at bind time with a typed
//! configuration error, not at first use.

use crate::context::contract::DataContext;
use crate::context::phase::{LifecyclePhase, Validity};
use crate::error::ContextError;
use crate::store::{BudgetStore, Institution};
use crate::types::{WorkbookContent, WorkbookType, WorkflowPurpose};
use crate::workbook::{Workbook, WorkbookAttr, WorkbookCollection};
use std::any::Any;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, error};

/// Forwarding wrapper around any [`DataContext`] provider.
pub struct DataContextBinding {
    provider: Box<dyn DataContext>,
}

impl std::fmt::Debug for DataContextBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContextBinding")
            .field("dc_id", &self.provider.dc_id())
            .finish()
    }
}

impl DataContextBinding {
    /// Bind a provider. `None`, or a provider without an identity, is a
    /// configuration error surfaced immediately.
    pub fn bind(provider: Option<Box<dyn DataContext>>) -> Result<Self, ContextError> {
        let provider = Self::checked(provider)?;
        debug!(dc_id = provider.dc_id(), "data context bound");
        Ok(DataContextBinding { provider })
    }

    /// Replace the bound provider, subject to the same bind-time checks.
    pub fn rebind(&mut self, provider: Option<Box<dyn DataContext>>) -> Result<(), ContextError> {
        self.provider = Self::checked(provider)?;
        Ok(())
    }

    pub fn provider(&self) -> &dyn DataContext {
        self.provider.as_ref()
    }

    pub fn provider_mut(&mut self) -> &mut dyn DataContext {
        self.provider.as_mut()
    }

    pub fn into_inner(self) -> Box<dyn DataContext> {
        self.provider
    }

    fn checked(
        provider: Option<Box<dyn DataContext>>,
    ) -> Result<Box<dyn DataContext>, ContextError> {
        let Some(provider) = provider else {
            error!("cannot bind: no data context provider supplied");
            return Err(ContextError::Configuration(
                "cannot bind: no data context provider supplied".to_string(),
            ));
        };
        if provider.dc_id().is_empty() {
            error!("cannot bind: provider has no dc_id");
            return Err(ContextError::Configuration(
                "cannot bind: provider has no dc_id".to_string(),
            ));
        }
        Ok(provider)
    }
}

impl DataContext for DataContextBinding {
    fn dc_id(&self) -> &str {
        self.provider.dc_id()
    }

    fn set_dc_id(&mut self, dc_id: String) {
        self.provider.set_dc_id(dc_id);
    }

    fn phase(&self) -> LifecyclePhase {
        self.provider.phase()
    }

    fn initialized(&self) -> bool {
        self.provider.initialized()
    }

    fn validity(&self) -> Validity {
        self.provider.validity()
    }

    fn valid(&self) -> bool {
        self.provider.valid()
    }

    fn initialize(&mut self) -> Result<(), ContextError> {
        self.provider.initialize()
    }

    fn mark_initialized(&mut self) {
        self.provider.mark_initialized();
    }

    fn store(&self) -> Option<&BudgetStore> {
        self.provider.store()
    }

    fn store_mut(&mut self) -> Option<&mut BudgetStore> {
        self.provider.store_mut()
    }

    fn set_store(&mut self, store: BudgetStore) {
        self.provider.set_store(store);
    }

    fn store_changed(&self) -> bool {
        self.provider.store_changed()
    }

    fn set_store_changed(&mut self, changed: bool) {
        self.provider.set_store_changed(changed);
    }

    fn load_store(&mut self, url: &str) -> Result<(), ContextError> {
        self.provider.load_store(url)
    }

    fn save_store(&mut self, url: &str) -> Result<(), ContextError> {
        self.provider.save_store(url)
    }

    fn institution(&self) -> Option<&Institution> {
        self.provider.institution()
    }

    fn institution_key(&self) -> Option<&str> {
        self.provider.institution_key()
    }

    fn set_institution_key(&mut self, fi_key: &str) -> Result<(), ContextError> {
        self.provider.set_institution_key(fi_key)
    }

    fn workflow_key(&self) -> Option<&str> {
        self.provider.workflow_key()
    }

    fn set_workflow_key(&mut self, wf_key: &str) -> Result<(), ContextError> {
        self.provider.set_workflow_key(wf_key)
    }

    fn workflow_purpose(&self) -> Option<WorkflowPurpose> {
        self.provider.workflow_purpose()
    }

    fn set_workflow_purpose(&mut self, purpose: WorkflowPurpose) {
        self.provider.set_workflow_purpose(purpose);
    }

    fn workbook(&self) -> Option<&Workbook> {
        self.provider.workbook()
    }

    fn set_workbook(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.provider.set_workbook(wb_id)
    }

    fn clear_workbook(&mut self) {
        self.provider.clear_workbook();
    }

    fn workbook_id(&self) -> Option<&str> {
        self.provider.workbook_id()
    }

    fn workbook_name(&self) -> Option<&str> {
        self.provider.workbook_name()
    }

    fn workbook_type(&self) -> Option<WorkbookType> {
        self.provider.workbook_type()
    }

    fn workbook_index(&self) -> Option<usize> {
        self.provider.workbook_index()
    }

    fn all_workbooks(&self) -> bool {
        self.provider.all_workbooks()
    }

    fn set_all_workbooks(&mut self, all: bool) {
        self.provider.set_all_workbooks(all);
    }

    fn validate_institution_key(&self, fi_key: &str) -> bool {
        self.provider.validate_institution_key(fi_key)
    }

    fn validate_workflow_key(&self, wf_key: &str) -> bool {
        self.provider.validate_workflow_key(wf_key)
    }

    fn validate_workflow_purpose(&self, candidate: &str) -> bool {
        self.provider.validate_workflow_purpose(candidate)
    }

    fn validate_workbook_type(&self, candidate: &str) -> bool {
        self.provider.validate_workbook_type(candidate)
    }

    fn validate_workbook_name(&self, candidate: &str) -> bool {
        self.provider.validate_workbook_name(candidate)
    }

    fn validate_workbook_id(&self, wb_id: &str) -> bool {
        self.provider.validate_workbook_id(wb_id)
    }

    fn validate_workbook_index(&self, index: usize) -> bool {
        self.provider.validate_workbook_index(index)
    }

    fn workbooks(&self) -> Option<&WorkbookCollection> {
        self.provider.workbooks()
    }

    fn workbook_by_id(&self, wb_id: &str) -> Option<&Workbook> {
        self.provider.workbook_by_id(wb_id)
    }

    fn workbook_by_index(&self, index: usize) -> Option<&Workbook> {
        self.provider.workbook_by_index(index)
    }

    fn workbook_index_of(&self, wb_id: &str) -> Option<usize> {
        self.provider.workbook_index_of(wb_id)
    }

    fn workbook_find(&self, attr: WorkbookAttr, value: &str) -> Option<&Workbook> {
        self.provider.workbook_find(attr, value)
    }

    fn workbook_add(&mut self, workbook: Workbook) -> Result<(), ContextError> {
        self.provider.workbook_add(workbook)
    }

    fn workbook_remove(&mut self, index: usize) -> Result<Workbook, ContextError> {
        self.provider.workbook_remove(index)
    }

    fn workbook_loaded(&self, wb_id: &str) -> bool {
        self.provider.workbook_loaded(wb_id)
    }

    fn purpose_folder(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<String> {
        self.provider.purpose_folder(wf_key, purpose)
    }

    fn purpose_folder_path(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<PathBuf> {
        self.provider.purpose_folder_path(wf_key, purpose)
    }

    fn content_get(
        &mut self,
        wb_id: &str,
        force_load: bool,
    ) -> Result<&WorkbookContent, ContextError> {
        self.provider.content_get(wb_id, force_load)
    }

    fn content_put(&mut self, content: WorkbookContent, wb_id: &str) -> Result<(), ContextError> {
        self.provider.content_put(content, wb_id)
    }

    fn content_evict(&mut self, wb_id: &str) -> bool {
        self.provider.content_evict(wb_id)
    }

    fn workbook_load(&mut self, wb_id: &str) -> Result<&WorkbookContent, ContextError> {
        self.provider.workbook_load(wb_id)
    }

    fn workbook_save(&mut self, wb_id: &str) -> Result<(), ContextError> {
        self.provider.workbook_save(wb_id)
    }

    fn category_service(&self) -> Option<Rc<dyn Any>> {
        self.provider.category_service()
    }

    fn set_category_service(&mut self, service: Rc<dyn Any>) {
        self.provider.set_category_service(service);
    }
}
