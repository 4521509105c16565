//! Budget store document model.
//!
//! The store is the single persisted document of record for a session:
//! institutions with their workbook collections, workflows with their folder
//! roles, and the selection defaults that seed a fresh data context. It is
//! owned by whoever constructs the engine; the engine re-reads it on every
//! access instead of caching derived values.

pub mod persistence;

pub use persistence::{JsonStoreLoader, StoreLoader};

use crate::types::WorkflowPurpose;
use crate::workbook::WorkbookCollection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named source of financial data (bank, brokerage), keyed by a stable
/// string. Owns the workbook collection for that institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    pub fi_key: String,
    pub name: String,
    #[serde(default)]
    pub kind: String,
    /// Storage folder for this institution, relative to the store folder.
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub workbooks: WorkbookCollection,
}

impl Institution {
    pub fn new(fi_key: impl Into<String>, name: impl Into<String>) -> Self {
        let fi_key = fi_key.into();
        Institution {
            folder: fi_key.clone(),
            fi_key,
            name: name.into(),
            kind: String::new(),
            workbooks: WorkbookCollection::new(),
        }
    }
}

/// A named processing stage with a folder role per workflow purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub wf_key: String,
    pub name: String,
    /// Purpose to folder-name mapping, e.g. Input -> "incoming".
    #[serde(default)]
    pub folders: BTreeMap<WorkflowPurpose, String>,
}

impl Workflow {
    pub fn new(wf_key: impl Into<String>, name: impl Into<String>) -> Self {
        Workflow {
            wf_key: wf_key.into(),
            name: name.into(),
            folders: BTreeMap::new(),
        }
    }

    pub fn with_folder(mut self, purpose: WorkflowPurpose, folder: impl Into<String>) -> Self {
        self.folders.insert(purpose, folder.into());
        self
    }

    pub fn purpose_folder(&self, purpose: WorkflowPurpose) -> Option<&str> {
        self.folders.get(&purpose).map(String::as_str)
    }
}

/// Selection defaults persisted with the store; they seed the live
/// selection when a data context initializes against this document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDataContext {
    #[serde(default)]
    pub fi_key: Option<String>,
    #[serde(default)]
    pub wf_key: Option<String>,
    #[serde(default)]
    pub wf_purpose: Option<WorkflowPurpose>,
}

/// The persisted budget store document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStore {
    #[serde(default)]
    pub id: String,
    /// Root storage folder for the budget tree.
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub institutions: BTreeMap<String, Institution>,
    #[serde(default)]
    pub workflows: BTreeMap<String, Workflow>,
    #[serde(default)]
    pub data_context: StoreDataContext,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub last_modified_by: String,
}

impl Default for BudgetStore {
    fn default() -> Self {
        let now = Utc::now();
        BudgetStore {
            id: String::new(),
            folder: String::new(),
            institutions: BTreeMap::new(),
            workflows: BTreeMap::new(),
            data_context: StoreDataContext::default(),
            created: now,
            last_modified: now,
            last_modified_by: String::new(),
        }
    }
}

impl BudgetStore {
    /// Empty pre-initialization placeholder. The engine never constructs a
    /// real store from scratch; this only bridges the window before a
    /// loaded document arrives.
    pub fn placeholder() -> Self {
        BudgetStore::default()
    }

    pub fn institution(&self, fi_key: &str) -> Option<&Institution> {
        self.institutions.get(fi_key)
    }

    pub fn institution_mut(&mut self, fi_key: &str) -> Option<&mut Institution> {
        self.institutions.get_mut(fi_key)
    }

    pub fn workflow(&self, wf_key: &str) -> Option<&Workflow> {
        self.workflows.get(wf_key)
    }

    /// Stamp a modification on the document.
    pub fn touch(&mut self, modified_by: &str) {
        self.last_modified = Utc::now();
        self.last_modified_by = modified_by.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Workbook;

    #[test]
    fn store_document_round_trips_through_json() {
        let mut store = BudgetStore::default();
        store.id = "budget-2026".to_string();
        store.folder = "~/budget".to_string();

        let mut boa = Institution::new("boa", "Bank of America");
        boa.workbooks.insert(
            Workbook::new(
                "working|txns.xlsx",
                "txns.xlsx",
                "file:///budget/boa/working/txns.xlsx",
                "boa",
                "intake",
                WorkflowPurpose::Working,
            )
            .with_folder("working"),
        );
        store.institutions.insert("boa".to_string(), boa);
        store.workflows.insert(
            "intake".to_string(),
            Workflow::new("intake", "Intake")
                .with_folder(WorkflowPurpose::Input, "incoming")
                .with_folder(WorkflowPurpose::Working, "working"),
        );
        store.data_context.fi_key = Some("boa".to_string());

        let json = serde_json::to_string(&store).unwrap();
        let back: BudgetStore = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, "budget-2026");
        assert_eq!(back.institutions.len(), 1);
        let workbooks = &back.institution("boa").unwrap().workbooks;
        assert!(workbooks.contains("working|txns.xlsx"));
        assert_eq!(
            workbooks.get("working|txns.xlsx").unwrap().wf_folder.as_deref(),
            Some("working")
        );
        assert_eq!(
            back.workflow("intake").unwrap().purpose_folder(WorkflowPurpose::Input),
            Some("incoming")
        );
        assert_eq!(back.data_context.fi_key.as_deref(), Some("boa"));
    }

    #[test]
    fn placeholder_is_empty() {
        let store = BudgetStore::placeholder();
        assert!(store.institutions.is_empty());
        assert!(store.workflows.is_empty());
        assert!(store.data_context.fi_key.is_none());
    }
}
