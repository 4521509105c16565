//! Identity validators: pure predicates over the store and collections.
//!
//! No side effects and no panics on bad input. Lifecycle gating (fail
//! closed when not ready, optimistic while initializing) is layered on top
//! by the context trait methods, not here.

use crate::store::BudgetStore;
use crate::types::{WorkbookType, WorkflowPurpose, RESERVED_WORKFLOW_ALL};
use crate::workbook::WorkbookCollection;

pub fn institution_key_exists(store: &BudgetStore, fi_key: &str) -> bool {
    store.institutions.contains_key(fi_key)
}

/// A concrete workflow key must exist in the store. The reserved wildcard
/// "all" is never a valid single key.
pub fn workflow_key_exists(store: &BudgetStore, wf_key: &str) -> bool {
    wf_key != RESERVED_WORKFLOW_ALL && store.workflows.contains_key(wf_key)
}

/// Purpose candidates are checked against the fixed enumerated set, not
/// store data.
pub fn workflow_purpose_value(candidate: &str) -> bool {
    WorkflowPurpose::parse(candidate).is_some()
}

/// Type tags are checked against the fixed enumerated set, not store data.
pub fn workbook_type_value(candidate: &str) -> bool {
    WorkbookType::parse(candidate).is_some()
}

pub fn workbook_name_plausible(candidate: &str) -> bool {
    !candidate.is_empty()
}

pub fn workbook_id_exists(collection: &WorkbookCollection, wb_id: &str) -> bool {
    collection.contains(wb_id)
}

/// An index is valid only against a non-empty, coherent collection and
/// within `[0, len)`.
pub fn workbook_index_in_range(collection: &WorkbookCollection, index: usize) -> bool {
    if collection.is_empty() || collection.verify().is_err() {
        return false;
    }
    index < collection.len()
}
