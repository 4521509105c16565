//! Budget domain model: the richer in-memory backing for the store-bound
//! data context.
//!
//! The model owns the store document of record plus the loader that
//! produced it, and exposes typed accessors over the document. A working
//! data context derives all of its data from here instead of owning a
//! store itself.

use crate::error::ContextError;
use crate::store::{BudgetStore, Institution, StoreLoader, Workflow};
use crate::types::WorkflowPurpose;
use crate::workbook::WorkbookCollection;
use std::fmt;
use tracing::info;

pub struct BudgetModel {
    store: BudgetStore,
    url: Option<String>,
    loader: Box<dyn StoreLoader>,
    initialized: bool,
}

impl fmt::Debug for BudgetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetModel")
            .field("url", &self.url)
            .field("initialized", &self.initialized)
            .field("institutions", &self.store.institutions.len())
            .finish_non_exhaustive()
    }
}

impl BudgetModel {
    /// Build a model around an already-loaded store document.
    pub fn new(store: BudgetStore, loader: Box<dyn StoreLoader>) -> Self {
        BudgetModel {
            store,
            url: None,
            loader,
            initialized: true,
        }
    }

    /// Load the store document from `url` and build the model around it.
    pub fn load(loader: Box<dyn StoreLoader>, url: &str) -> Result<Self, ContextError> {
        let store = loader.load_store(url)?;
        info!(url, institutions = store.institutions.len(), "budget model loaded");
        Ok(BudgetModel {
            store,
            url: Some(url.to_string()),
            loader,
            initialized: true,
        })
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn store(&self) -> &BudgetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BudgetStore {
        &mut self.store
    }

    pub fn replace_store(&mut self, store: BudgetStore) {
        self.store = store;
    }

    pub fn institution(&self, fi_key: &str) -> Option<&Institution> {
        self.store.institution(fi_key)
    }

    pub fn workbooks(&self, fi_key: &str) -> Option<&WorkbookCollection> {
        self.store.institution(fi_key).map(|fi| &fi.workbooks)
    }

    pub fn workflow(&self, wf_key: &str) -> Option<&Workflow> {
        self.store.workflow(wf_key)
    }

    pub fn purpose_folder(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<&str> {
        self.store.workflow(wf_key)?.purpose_folder(purpose)
    }

    /// Replace the store document with a fresh load from `url`.
    pub fn reload_from(&mut self, url: &str) -> Result<(), ContextError> {
        let store = self.loader.load_store(url)?;
        self.store = store;
        self.url = Some(url.to_string());
        self.initialized = true;
        Ok(())
    }

    /// Save the store document; `url` overrides the model's source url.
    pub fn save(&mut self, url: Option<&str>, modified_by: &str) -> Result<(), ContextError> {
        let target = url
            .map(str::to_string)
            .or_else(|| self.url.clone())
            .ok_or_else(|| {
                ContextError::State("save: budget model has no store url".to_string())
            })?;
        self.store.touch(modified_by);
        self.loader.save_store(&self.store, &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    struct EmptyLoader;

    impl StoreLoader for EmptyLoader {
        fn load_store(&self, url: &str) -> Result<BudgetStore, StorageError> {
            let mut store = BudgetStore::default();
            store.id = url.to_string();
            Ok(store)
        }

        fn save_store(&self, _store: &BudgetStore, _url: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn load_records_source_url() {
        let model = BudgetModel::load(Box::new(EmptyLoader), "file:///budget.json").unwrap();
        assert_eq!(model.url(), Some("file:///budget.json"));
        assert!(model.initialized());
        assert_eq!(model.store().id, "file:///budget.json");
    }

    #[test]
    fn typed_accessors_read_the_document() {
        let mut store = BudgetStore::default();
        store
            .institutions
            .insert("boa".to_string(), Institution::new("boa", "Bank of America"));
        store.workflows.insert(
            "intake".to_string(),
            Workflow::new("intake", "Intake").with_folder(WorkflowPurpose::Input, "incoming"),
        );

        let model = BudgetModel::new(store, Box::new(EmptyLoader));
        assert_eq!(model.institution("boa").unwrap().name, "Bank of America");
        assert!(model.workbooks("boa").unwrap().is_empty());
        assert_eq!(model.workflow("intake").unwrap().name, "Intake");
        assert_eq!(
            model.purpose_folder("intake", WorkflowPurpose::Input),
            Some("incoming")
        );
        assert_eq!(model.purpose_folder("intake", WorkflowPurpose::Output), None);
    }

    #[test]
    fn save_without_url_is_a_state_error() {
        let mut model = BudgetModel::new(BudgetStore::default(), Box::new(EmptyLoader));
        let err = model.save(None, "test").unwrap_err();
        assert!(matches!(err, ContextError::State(_)));
        assert!(model.save(Some("file:///out.json"), "test").is_ok());
    }
}
