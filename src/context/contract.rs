//! The data context contract.
//!
//! A data context is the bridge between the view/view-model layers and the
//! budget domain data: it answers "what is the user looking at right now"
//! and keeps that selection consistent with the store document. Two
//! backing strategies implement this trait — a self-contained engine and a
//! store-bound engine deriving its data from a richer model — and the
//! forwarding binding wraps either one. Callers cannot tell them apart.
//!
//! Reads fail soft (`None` when the context is not usable); configuration
//! problems fail fast with typed errors. The derived workbook views (id,
//! name, type, index) have no setters anywhere on this trait: the only way
//! to change them is to reassign the current workbook selection.

use crate::context::phase::{LifecyclePhase, Validity};
use crate::error::ContextError;
use crate::store::{BudgetStore, Institution};
use crate::types::{WorkbookContent, WorkbookType, WorkflowPurpose};
use crate::workbook::{Workbook, WorkbookAttr, WorkbookCollection};
use std::any::Any;
use std::path::PathBuf;
use std::rc::Rc;

pub trait DataContext {
    // Identity of the implementation behind this context.

    fn dc_id(&self) -> &str;

    fn set_dc_id(&mut self, dc_id: String);

    // Lifecycle and validity.

    fn phase(&self) -> LifecyclePhase;

    fn initialized(&self) -> bool {
        self.phase() == LifecyclePhase::Ready
    }

    /// The validity gate: optimistic while initializing; once ready,
    /// requires the store and a resolvable institution selection.
    fn validity(&self) -> Validity;

    fn valid(&self) -> bool {
        self.validity().usable()
    }

    /// Begin (or continue) initialization: enter the initializing phase,
    /// seed the selection from the store's persisted defaults, and become
    /// ready once the store and institution selection are both present.
    fn initialize(&mut self) -> Result<(), ContextError>;

    /// Force the ready phase; bootstrap code calls this after populating
    /// fields by hand.
    fn mark_initialized(&mut self);

    // Store of record.

    fn store(&self) -> Option<&BudgetStore>;

    fn store_mut(&mut self) -> Option<&mut BudgetStore>;

    fn set_store(&mut self, store: BudgetStore);

    fn store_changed(&self) -> bool;

    fn set_store_changed(&mut self, changed: bool);

    /// Load the store document from `url` via the store loader and adopt
    /// it as the document of record.
    fn load_store(&mut self, url: &str) -> Result<(), ContextError>;

    fn save_store(&mut self, url: &str) -> Result<(), ContextError>;

    // Institution selection. The record getter re-reads the store on every
    // access; the returned record is the store's own entry, never a copy.

    fn institution(&self) -> Option<&Institution>;

    fn institution_key(&self) -> Option<&str> {
        self.institution().map(|fi| fi.fi_key.as_str())
    }

    /// Select an institution by key. Rejects unknown keys, leaving the
    /// prior selection unchanged; an accepted change drops any workbook
    /// selection bound to the old institution.
    fn set_institution_key(&mut self, fi_key: &str) -> Result<(), ContextError>;

    // Workflow selection.

    fn workflow_key(&self) -> Option<&str>;

    /// Select a workflow by key. The reserved wildcard "all" is rejected;
    /// use [`set_all_workbooks`](Self::set_all_workbooks) instead.
    fn set_workflow_key(&mut self, wf_key: &str) -> Result<(), ContextError>;

    fn workflow_purpose(&self) -> Option<WorkflowPurpose>;

    fn set_workflow_purpose(&mut self, purpose: WorkflowPurpose);

    // Workbook selection and its derived read-only views.

    fn workbook(&self) -> Option<&Workbook>;

    /// Select a workbook by id within the current institution's collection.
    fn set_workbook(&mut self, wb_id: &str) -> Result<(), ContextError>;

    fn clear_workbook(&mut self);

    fn workbook_id(&self) -> Option<&str> {
        self.workbook().map(|wb| wb.wb_id.as_str())
    }

    fn workbook_name(&self) -> Option<&str> {
        self.workbook().map(|wb| wb.name.as_str())
    }

    fn workbook_type(&self) -> Option<WorkbookType> {
        self.workbook().map(|wb| wb.wb_type)
    }

    /// Zero-based position of the current workbook in the collection's
    /// ascending-by-id order; recomputed on every call.
    fn workbook_index(&self) -> Option<usize> {
        let wb_id = self.workbook().map(|wb| wb.wb_id.clone())?;
        self.workbook_index_of(&wb_id)
    }

    /// Wildcard flag: the current operation targets all workbooks.
    fn all_workbooks(&self) -> bool;

    fn set_all_workbooks(&mut self, all: bool);

    // Identity validators. Fail closed when the context is not ready,
    // optimistic while it initializes.

    fn validate_institution_key(&self, fi_key: &str) -> bool;

    fn validate_workflow_key(&self, wf_key: &str) -> bool;

    fn validate_workflow_purpose(&self, candidate: &str) -> bool;

    fn validate_workbook_type(&self, candidate: &str) -> bool;

    fn validate_workbook_name(&self, candidate: &str) -> bool;

    fn validate_workbook_id(&self, wb_id: &str) -> bool;

    fn validate_workbook_index(&self, index: usize) -> bool;

    // Workbook collection of the current institution.

    fn workbooks(&self) -> Option<&WorkbookCollection>;

    fn workbook_by_id(&self, wb_id: &str) -> Option<&Workbook>;

    fn workbook_by_index(&self, index: usize) -> Option<&Workbook>;

    fn workbook_index_of(&self, wb_id: &str) -> Option<usize>;

    fn workbook_find(&self, attr: WorkbookAttr, value: &str) -> Option<&Workbook>;

    /// Register a new workbook in the current institution's collection.
    fn workbook_add(&mut self, workbook: Workbook) -> Result<(), ContextError>;

    /// Remove the workbook at `index`, evicting its cached content, and
    /// return the record.
    fn workbook_remove(&mut self, index: usize) -> Result<Workbook, ContextError>;

    fn workbook_loaded(&self, wb_id: &str) -> bool;

    // Workflow folder resolution.

    fn purpose_folder(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<String>;

    fn purpose_folder_path(&self, wf_key: &str, purpose: WorkflowPurpose) -> Option<PathBuf>;

    // Content operations. All delegate storage work to the injected
    // collaborator and keep the cache consistent with its outcome.

    /// Content for `wb_id`: the cached entry, or with `force_load` a fresh
    /// load through storage that also makes the workbook current.
    fn content_get(
        &mut self,
        wb_id: &str,
        force_load: bool,
    ) -> Result<&WorkbookContent, ContextError>;

    /// Save `content` through storage, then cache it. A failed save leaves
    /// the previous cache state untouched.
    fn content_put(&mut self, content: WorkbookContent, wb_id: &str) -> Result<(), ContextError>;

    /// Drop the cached content for `wb_id` without touching storage.
    fn content_evict(&mut self, wb_id: &str) -> bool;

    /// Load the workbook's content from storage and make it current.
    fn workbook_load(&mut self, wb_id: &str) -> Result<&WorkbookContent, ContextError>;

    /// Save the workbook's cached content back to storage.
    fn workbook_save(&mut self, wb_id: &str) -> Result<(), ContextError>;

    // Pass-through slot for the category/classification service. The
    // engine never calls into it; it only carries the reference so
    // upstream code can discover it.

    fn category_service(&self) -> Option<Rc<dyn Any>>;

    fn set_category_service(&mut self, service: Rc<dyn Any>);
}
