//! Shared engine mechanics composed by both concrete data contexts.
//!
//! `EngineCore` owns the selection state, the content cache, and the
//! category-service slot. The store itself lives with the concrete engine
//! (self-contained) or its backing model (store-bound) and is passed in per
//! call, which keeps both engines behaviourally identical without an
//! inheritance chain.

use crate::context::cache::ContentCache;
use crate::context::phase::LifecyclePhase;
use crate::context::state::SelectionState;
use crate::context::validate;
use crate::error::ContextError;
use crate::store::BudgetStore;
use crate::types::{WorkbookContent, WorkflowPurpose};
use crate::workbook::{Workbook, WorkbookAttr, WorkbookCollection, WorkbookStorage};
use std::any::Any;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, error, warn};

fn as_view<'a>(store: &'a Option<&mut BudgetStore>) -> Option<&'a BudgetStore> {
    store.as_ref().map(|store| &**store)
}

pub(crate) struct EngineCore {
    pub state: SelectionState,
    pub cache: ContentCache,
    pub category_service: Option<Rc<dyn Any>>,
}

impl EngineCore {
    pub fn new(dc_id: impl Into<String>, storage: Box<dyn WorkbookStorage>) -> Self {
        EngineCore {
            state: SelectionState::new(dc_id),
            cache: ContentCache::new(storage),
            category_service: None,
        }
    }

    /// Gate an operation on the validity of the context; initializing
    /// contexts pass optimistically.
    pub fn ensure_usable(
        &self,
        store: Option<&BudgetStore>,
        op: &'static str,
    ) -> Result<(), ContextError> {
        let validity = self.state.validity(store);
        if validity.usable() {
            Ok(())
        } else {
            warn!(op, reason = validity.reason(), "operation refused");
            Err(ContextError::State(format!("{op}: {}", validity.reason())))
        }
    }

    // Lifecycle-gated validators: fail closed when not ready, optimistic
    // while initializing, pure predicates once ready.

    fn gated(&self, ready_check: impl FnOnce() -> bool) -> bool {
        match self.state.phase {
            LifecyclePhase::Uninitialized => false,
            LifecyclePhase::Initializing => true,
            LifecyclePhase::Ready => ready_check(),
        }
    }

    pub fn validate_institution_key(&self, store: Option<&BudgetStore>, fi_key: &str) -> bool {
        self.gated(|| {
            store
                .map(|store| validate::institution_key_exists(store, fi_key))
                .unwrap_or(false)
        })
    }

    pub fn validate_workflow_key(&self, store: Option<&BudgetStore>, wf_key: &str) -> bool {
        self.gated(|| {
            store
                .map(|store| validate::workflow_key_exists(store, wf_key))
                .unwrap_or(false)
        })
    }

    pub fn validate_workflow_purpose(&self, candidate: &str) -> bool {
        self.gated(|| validate::workflow_purpose_value(candidate))
    }

    pub fn validate_workbook_type(&self, candidate: &str) -> bool {
        self.gated(|| validate::workbook_type_value(candidate))
    }

    pub fn validate_workbook_name(&self, candidate: &str) -> bool {
        self.gated(|| validate::workbook_name_plausible(candidate))
    }

    pub fn validate_workbook_id(&self, store: Option<&BudgetStore>, wb_id: &str) -> bool {
        self.gated(|| {
            self.state
                .collection(store)
                .map(|collection| validate::workbook_id_exists(collection, wb_id))
                .unwrap_or(false)
        })
    }

    pub fn validate_workbook_index(&self, store: Option<&BudgetStore>, index: usize) -> bool {
        self.gated(|| {
            self.state
                .collection(store)
                .map(|collection| validate::workbook_index_in_range(collection, index))
                .unwrap_or(false)
        })
    }

    // Fail-soft collection reads: coherence failures are logged and read
    // as absent rather than panicking across the public boundary.

    pub fn workbook_by_index<'s>(
        &self,
        store: Option<&'s BudgetStore>,
        index: usize,
    ) -> Option<&'s Workbook> {
        let collection = self.state.collection(store)?;
        match collection.by_index(index) {
            Ok(workbook) => Some(workbook),
            Err(ContextError::NotFound(_)) => None,
            Err(err) => {
                error!(op = "workbook_by_index", index, %err, "collection query failed");
                None
            }
        }
    }

    pub fn workbook_index_of(&self, store: Option<&BudgetStore>, wb_id: &str) -> Option<usize> {
        let collection = self.state.collection(store)?;
        match collection.index_of(wb_id) {
            Ok(position) => position,
            Err(err) => {
                error!(op = "workbook_index_of", wb_id, %err, "collection query failed");
                None
            }
        }
    }

    pub fn workbook_find<'s>(
        &self,
        store: Option<&'s BudgetStore>,
        attr: WorkbookAttr,
        value: &str,
    ) -> Option<&'s Workbook> {
        let collection = self.state.collection(store)?;
        match collection.find(attr, value) {
            Ok(found) => found,
            Err(err) => {
                error!(op = "workbook_find", ?attr, value, %err, "collection query failed");
                None
            }
        }
    }

    pub fn workbook_loaded(&self, store: Option<&BudgetStore>, wb_id: &str) -> bool {
        if !self.state.usable(store) {
            return false;
        }
        self.validate_workbook_id(store, wb_id) && self.cache.is_cached(wb_id)
    }

    // Collection mutations.

    pub fn workbook_add(
        &mut self,
        store: Option<&mut BudgetStore>,
        workbook: Workbook,
    ) -> Result<(), ContextError> {
        self.ensure_usable(as_view(&store), "workbook_add")?;
        let collection = self.collection_mut(store, "workbook_add")?;
        if collection.contains(&workbook.wb_id) {
            warn!(op = "workbook_add", wb_id = %workbook.wb_id, "duplicate workbook id");
            return Err(ContextError::validation("wb_id", workbook.wb_id));
        }
        debug!(wb_id = %workbook.wb_id, "workbook registered");
        collection.insert(workbook);
        self.state.store_changed = true;
        Ok(())
    }

    /// Remove the workbook at `index`, evicting any cached content and
    /// clearing the loaded flag on the returned record.
    pub fn workbook_remove(
        &mut self,
        store: Option<&mut BudgetStore>,
        index: usize,
    ) -> Result<Workbook, ContextError> {
        self.ensure_usable(as_view(&store), "workbook_remove")?;
        let collection = self.collection_mut(store, "workbook_remove")?;
        let mut removed = collection.remove_by_index(index)?;
        self.cache.evict(&removed.wb_id);
        removed.loaded = false;
        self.state.store_changed = true;
        debug!(wb_id = %removed.wb_id, index, "workbook removed");
        Ok(removed)
    }

    // Content operations.

    pub fn content_get<'a>(
        &'a mut self,
        store: Option<&mut BudgetStore>,
        wb_id: &str,
        force_load: bool,
    ) -> Result<&'a WorkbookContent, ContextError> {
        self.ensure_usable(as_view(&store), "content_get")?;
        let collection = self.collection_mut(store, "content_get")?;
        let record = collection.get_mut(wb_id).ok_or_else(|| {
            warn!(op = "content_get", wb_id, "workbook not in collection");
            ContextError::NotFound(format!("workbook '{wb_id}' not found"))
        })?;
        let content = self.cache.get(record, force_load)?;
        if force_load {
            // A freshly loaded workbook becomes the current one.
            self.state.wb_id = Some(wb_id.to_string());
        }
        Ok(content)
    }

    pub fn content_put(
        &mut self,
        store: Option<&mut BudgetStore>,
        content: WorkbookContent,
        wb_id: &str,
    ) -> Result<(), ContextError> {
        self.ensure_usable(as_view(&store), "content_put")?;
        let collection = self.collection_mut(store, "content_put")?;
        let record = collection.get_mut(wb_id).ok_or_else(|| {
            warn!(op = "content_put", wb_id, "workbook not in collection");
            ContextError::NotFound(format!("workbook '{wb_id}' not found"))
        })?;
        self.cache.put(content, record)
    }

    pub fn workbook_save(
        &mut self,
        store: Option<&mut BudgetStore>,
        wb_id: &str,
    ) -> Result<(), ContextError> {
        self.ensure_usable(as_view(&store), "workbook_save")?;
        let collection = self.collection_mut(store, "workbook_save")?;
        let record = collection.get_mut(wb_id).ok_or_else(|| {
            warn!(op = "workbook_save", wb_id, "workbook not in collection");
            ContextError::NotFound(format!("workbook '{wb_id}' not found"))
        })?;
        self.cache.save_cached(record)
    }

    // Folder resolution.

    pub fn purpose_folder(
        &self,
        store: Option<&BudgetStore>,
        wf_key: &str,
        purpose: WorkflowPurpose,
    ) -> Option<String> {
        if !self.state.usable(store) {
            return None;
        }
        store?
            .workflow(wf_key)?
            .purpose_folder(purpose)
            .map(str::to_string)
    }

    /// Pure path composition: store folder / institution folder / workflow
    /// purpose folder. No filesystem access.
    pub fn purpose_folder_path(
        &self,
        store: Option<&BudgetStore>,
        wf_key: &str,
        purpose: WorkflowPurpose,
    ) -> Option<PathBuf> {
        let folder = self.purpose_folder(store, wf_key, purpose)?;
        let store = store?;
        let institution = self.state.institution(Some(store))?;
        Some(
            PathBuf::from(&store.folder)
                .join(&institution.folder)
                .join(folder),
        )
    }

    fn collection_mut<'a>(
        &self,
        store: Option<&'a mut BudgetStore>,
        op: &'static str,
    ) -> Result<&'a mut WorkbookCollection, ContextError> {
        let Some(store) = store else {
            warn!(op, "store is not set");
            return Err(ContextError::State(format!("{op}: store is not set")));
        };
        let Some(fi_key) = self.state.fi_key.as_deref() else {
            warn!(op, "no institution is selected");
            return Err(ContextError::State(format!(
                "{op}: no institution is selected"
            )));
        };
        match store.institution_mut(fi_key) {
            Some(institution) => Ok(&mut institution.workbooks),
            None => {
                warn!(op, fi_key, "selected institution is missing from the store");
                Err(ContextError::State(format!(
                    "{op}: selected institution '{fi_key}' is missing from the store"
                )))
            }
        }
    }
}
