//! Tally: budget workbook data context engine.
//!
//! Tracks the current selection of a budget-tracking session — which
//! institution, which workflow, which workbook — keeps that selection
//! consistent with the persisted store document, and caches loaded workbook
//! content by stable id. Two backing strategies (self-contained and
//! store-bound) sit behind one contract and a forwarding binding.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod types;
pub mod workbook;

pub use context::{
    DataContext, DataContextBinding, LifecyclePhase, StandaloneDataContext, Validity,
    WorkingDataContext,
};
pub use error::{ContextError, StorageError};
pub use model::BudgetModel;
pub use store::{BudgetStore, Institution, JsonStoreLoader, StoreLoader, Workflow};
pub use types::{WorkbookContent, WorkbookType, WorkflowPurpose};
pub use workbook::{Workbook, WorkbookAttr, WorkbookCollection, WorkbookStorage};
