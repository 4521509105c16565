//! Selection state: the mutable "current" pointers shared by both engines.
//!
//! The current institution and workbook are held as stable keys and
//! re-derived from the store on every access, so the identity invariant
//! (the selected institution record IS the store's entry) holds by
//! construction and stale copies cannot exist.

use crate::context::phase::{LifecyclePhase, Validity};
use crate::context::validate;
use crate::error::ContextError;
use crate::store::{BudgetStore, Institution};
use crate::types::{WorkflowPurpose, RESERVED_WORKFLOW_ALL};
use crate::workbook::{Workbook, WorkbookCollection};
use tracing::{debug, warn};

/// Current selection pointers plus lifecycle phase and dirty flag.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub dc_id: String,
    pub phase: LifecyclePhase,
    pub fi_key: Option<String>,
    pub wf_key: Option<String>,
    pub wf_purpose: Option<WorkflowPurpose>,
    /// Current workbook selection, by stable id. Cached until reassigned;
    /// the record itself is re-resolved from the store on each access.
    pub wb_id: Option<String>,
    /// Wildcard flag: the current operation targets all workbooks.
    pub all_workbooks: bool,
    pub store_changed: bool,
}

impl SelectionState {
    pub fn new(dc_id: impl Into<String>) -> Self {
        SelectionState {
            dc_id: dc_id.into(),
            phase: LifecyclePhase::Uninitialized,
            fi_key: None,
            wf_key: None,
            wf_purpose: None,
            wb_id: None,
            all_workbooks: false,
            store_changed: false,
        }
    }

    /// The validity gate. While initializing, reads are optimistically
    /// permitted so bootstrap can populate fields before the full
    /// invariant holds.
    pub fn validity(&self, store: Option<&BudgetStore>) -> Validity {
        match self.phase {
            LifecyclePhase::Uninitialized => Validity::Invalid("context is not initialized"),
            LifecyclePhase::Initializing => Validity::Initializing,
            LifecyclePhase::Ready => {
                let Some(store) = store else {
                    return Validity::Invalid("store is not set");
                };
                let Some(fi_key) = self.fi_key.as_deref() else {
                    return Validity::Invalid("no institution is selected");
                };
                if store.institution(fi_key).is_none() {
                    return Validity::Invalid("selected institution is missing from the store");
                }
                Validity::Ready
            }
        }
    }

    pub fn usable(&self, store: Option<&BudgetStore>) -> bool {
        self.validity(store).usable()
    }

    /// Transition `Initializing` -> `Ready` once the store and a
    /// resolvable institution selection are both present.
    pub fn maybe_ready(&mut self, store: Option<&BudgetStore>) {
        if self.phase != LifecyclePhase::Initializing {
            return;
        }
        let resolvable = match (store, self.fi_key.as_deref()) {
            (Some(store), Some(fi_key)) => store.institution(fi_key).is_some(),
            _ => false,
        };
        if resolvable {
            debug!(dc_id = %self.dc_id, "data context ready");
            self.phase = LifecyclePhase::Ready;
        }
    }

    /// Seed the selection from the defaults persisted on the store
    /// document. Unresolvable defaults are skipped with a warning rather
    /// than failing initialization.
    pub fn seed_defaults(&mut self, store: &BudgetStore) {
        if let Some(fi_key) = store.data_context.fi_key.clone() {
            if validate::institution_key_exists(store, &fi_key) {
                self.fi_key = Some(fi_key);
            } else {
                warn!(fi_key = %fi_key, "store default institution not found; skipping");
            }
        }
        if let Some(wf_key) = store.data_context.wf_key.clone() {
            if validate::workflow_key_exists(store, &wf_key) {
                self.wf_key = Some(wf_key);
            } else {
                warn!(wf_key = %wf_key, "store default workflow not found; skipping");
            }
        }
        if let Some(purpose) = store.data_context.wf_purpose {
            self.wf_purpose = Some(purpose);
        }
    }

    // Derived views. Each re-resolves from the store; None when the gate
    // reports unusable.

    pub fn institution<'s>(&self, store: Option<&'s BudgetStore>) -> Option<&'s Institution> {
        if !self.usable(store) {
            return None;
        }
        store?.institution(self.fi_key.as_deref()?)
    }

    pub fn collection<'s>(&self, store: Option<&'s BudgetStore>) -> Option<&'s WorkbookCollection> {
        self.institution(store).map(|fi| &fi.workbooks)
    }

    pub fn workbook<'s>(&self, store: Option<&'s BudgetStore>) -> Option<&'s Workbook> {
        let collection = self.collection(store)?;
        collection.get(self.wb_id.as_deref()?)
    }

    // Selection mutations. Each validates first and leaves prior state
    // unchanged on rejection.

    pub fn select_institution(
        &mut self,
        store: Option<&BudgetStore>,
        fi_key: &str,
    ) -> Result<(), ContextError> {
        let accepted = match self.phase {
            LifecyclePhase::Uninitialized => false,
            LifecyclePhase::Initializing => true,
            LifecyclePhase::Ready => store
                .map(|store| validate::institution_key_exists(store, fi_key))
                .unwrap_or(false),
        };
        if !accepted {
            warn!(op = "select_institution", fi_key, "candidate rejected");
            return Err(ContextError::validation("fi_key", fi_key));
        }
        // Selecting a different institution invalidates any workbook
        // selection bound to the old one.
        if self.fi_key.as_deref() != Some(fi_key) {
            self.wb_id = None;
        }
        self.fi_key = Some(fi_key.to_string());
        self.maybe_ready(store);
        Ok(())
    }

    pub fn select_workflow(
        &mut self,
        store: Option<&BudgetStore>,
        wf_key: &str,
    ) -> Result<(), ContextError> {
        if wf_key == RESERVED_WORKFLOW_ALL {
            warn!(op = "select_workflow", wf_key, "reserved wildcard rejected");
            return Err(ContextError::validation("wf_key", wf_key));
        }
        let accepted = match self.phase {
            LifecyclePhase::Uninitialized => false,
            LifecyclePhase::Initializing => true,
            LifecyclePhase::Ready => store
                .map(|store| validate::workflow_key_exists(store, wf_key))
                .unwrap_or(false),
        };
        if !accepted {
            warn!(op = "select_workflow", wf_key, "candidate rejected");
            return Err(ContextError::validation("wf_key", wf_key));
        }
        self.wf_key = Some(wf_key.to_string());
        Ok(())
    }

    pub fn select_workbook(
        &mut self,
        store: Option<&BudgetStore>,
        wb_id: &str,
    ) -> Result<(), ContextError> {
        let accepted = match self.phase {
            LifecyclePhase::Uninitialized => false,
            LifecyclePhase::Initializing => true,
            LifecyclePhase::Ready => self
                .collection(store)
                .map(|collection| validate::workbook_id_exists(collection, wb_id))
                .unwrap_or(false),
        };
        if !accepted {
            warn!(op = "select_workbook", wb_id, "candidate rejected");
            return Err(ContextError::validation("wb_id", wb_id));
        }
        self.wb_id = Some(wb_id.to_string());
        Ok(())
    }
}
