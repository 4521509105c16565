//! Shared test fixtures: in-memory storage doubles and a sample store.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use tally::error::StorageError;
use tally::{
    BudgetModel, BudgetStore, DataContext, Institution, StandaloneDataContext, StoreLoader,
    Workbook, WorkbookContent, WorkbookStorage, WorkbookType, Workflow, WorkflowPurpose,
    WorkingDataContext,
};

/// Shared handle that owns a test double behind an `Rc` while still carrying
/// the storage-seam trait impls. It is a local newtype, so the orphan rule
/// permits implementing the crate's `WorkbookStorage`/`StoreLoader` traits for
/// it — which a bare `Rc<_>` (a foreign type) cannot carry in this test crate.
pub struct Shared<T>(Rc<T>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Shared(Rc::new(inner))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

/// In-memory workbook storage with scriptable failures.
#[derive(Default)]
pub struct MemoryStorage {
    pub contents: RefCell<HashMap<String, WorkbookContent>>,
    pub fail_loads: Cell<bool>,
    pub fail_saves: Cell<bool>,
    pub saves: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Shared<Self> {
        Shared::new(MemoryStorage::default())
    }

    pub fn seed(&self, locator: &str, content: WorkbookContent) {
        self.contents.borrow_mut().insert(locator.to_string(), content);
    }

    pub fn stored(&self, locator: &str) -> Option<WorkbookContent> {
        self.contents.borrow().get(locator).cloned()
    }
}

impl WorkbookStorage for Shared<MemoryStorage> {
    fn load(&self, locator: &str) -> Result<WorkbookContent, StorageError> {
        if self.fail_loads.get() {
            return Err(StorageError::Backend("scripted load failure".to_string()));
        }
        self.contents
            .borrow()
            .get(locator)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(locator.to_string()))
    }

    fn save(&self, content: &WorkbookContent, locator: &str) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Backend("scripted save failure".to_string()));
        }
        self.saves.set(self.saves.get() + 1);
        self.contents
            .borrow_mut()
            .insert(locator.to_string(), content.clone());
        Ok(())
    }
}

/// In-memory store loader serving one document.
#[derive(Default)]
pub struct MemoryLoader {
    pub document: RefCell<Option<BudgetStore>>,
    pub saved: RefCell<Option<(String, BudgetStore)>>,
}

impl MemoryLoader {
    pub fn with_document(store: BudgetStore) -> Shared<Self> {
        Shared::new(MemoryLoader {
            document: RefCell::new(Some(store)),
            saved: RefCell::new(None),
        })
    }
}

impl StoreLoader for Shared<MemoryLoader> {
    fn load_store(&self, url: &str) -> Result<BudgetStore, StorageError> {
        self.document
            .borrow()
            .clone()
            .ok_or_else(|| StorageError::NotFound(url.to_string()))
    }

    fn save_store(&self, store: &BudgetStore, url: &str) -> Result<(), StorageError> {
        *self.saved.borrow_mut() = Some((url.to_string(), store.clone()));
        Ok(())
    }
}

pub fn locator(fi_key: &str, wb_id: &str) -> String {
    format!("mem://{fi_key}/{wb_id}.xlsx")
}

pub fn sample_workbook(fi_key: &str, wb_id: &str) -> Workbook {
    Workbook::new(
        wb_id,
        format!("{wb_id}.xlsx"),
        locator(fi_key, wb_id),
        fi_key,
        "intake",
        WorkflowPurpose::Working,
    )
    .with_type(WorkbookType::ExcelTxns)
}

/// Store with two institutions. "boa" carries workbooks inserted as
/// b, a, c (ascending order is then a, b, c); "citi" is empty. Selection
/// defaults point at boa / intake / working.
pub fn sample_store() -> BudgetStore {
    let mut store = BudgetStore::default();
    store.id = "test-budget".to_string();
    store.folder = "/budget".to_string();

    let mut boa = Institution::new("boa", "Bank of America");
    for wb_id in ["b", "a", "c"] {
        boa.workbooks.insert(sample_workbook("boa", wb_id));
    }
    store.institutions.insert("boa".to_string(), boa);
    store
        .institutions
        .insert("citi".to_string(), Institution::new("citi", "CitiBank"));

    store.workflows.insert(
        "intake".to_string(),
        Workflow::new("intake", "Intake")
            .with_folder(WorkflowPurpose::Input, "incoming")
            .with_folder(WorkflowPurpose::Working, "working"),
    );
    store.workflows.insert(
        "categorize_transactions".to_string(),
        Workflow::new("categorize_transactions", "Categorize Transactions")
            .with_folder(WorkflowPurpose::Working, "working")
            .with_folder(WorkflowPurpose::Output, "categorized"),
    );

    store.data_context.fi_key = Some("boa".to_string());
    store.data_context.wf_key = Some("intake".to_string());
    store.data_context.wf_purpose = Some(WorkflowPurpose::Working);
    store
}

/// Ready self-contained context over the sample store.
pub fn standalone_context() -> (StandaloneDataContext, Shared<MemoryStorage>, Shared<MemoryLoader>) {
    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(sample_store());
    let mut ctx = StandaloneDataContext::new(
        Box::new(loader.clone()),
        Box::new(storage.clone()),
    )
    .with_store(sample_store());
    ctx.initialize().expect("initialize standalone context");
    assert!(ctx.initialized());
    (ctx, storage, loader)
}

/// Ready store-bound context over the sample store.
pub fn working_context() -> (WorkingDataContext, Shared<MemoryStorage>, Shared<MemoryLoader>) {
    let storage = MemoryStorage::new();
    let loader = MemoryLoader::with_document(sample_store());
    let model = BudgetModel::new(sample_store(), Box::new(loader.clone()));
    let mut ctx = WorkingDataContext::new(model, Box::new(storage.clone()));
    ctx.initialize().expect("initialize working context");
    assert!(ctx.initialized());
    (ctx, storage, loader)
}
