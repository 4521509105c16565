//! Workbook records and their ordered per-institution collection.
//!
//! A workbook is the metadata wrapper around one tracked data document; the
//! document content itself is opaque and lives in the content cache while
//! loaded.

pub mod collection;
pub mod storage;

pub use collection::{WorkbookAttr, WorkbookCollection};
pub use storage::WorkbookStorage;

use crate::types::{WorkbookType, WorkflowPurpose};
use serde::{Deserialize, Serialize};

/// Metadata record for a single tracked workbook.
///
/// `wb_id` is stable across renames and is the key of the owning
/// collection. `loaded` is transient runtime state and never persisted; it
/// is mutated only by the content cache operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub wb_id: String,
    pub name: String,
    #[serde(default)]
    pub wb_type: WorkbookType,
    /// Opaque locator (URL-like) understood by the storage collaborator.
    pub url: String,
    pub fi_key: String,
    pub wf_key: String,
    pub wf_purpose: WorkflowPurpose,
    #[serde(default)]
    pub wf_folder: Option<String>,
    #[serde(skip)]
    pub loaded: bool,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl Workbook {
    pub fn new(
        wb_id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        fi_key: impl Into<String>,
        wf_key: impl Into<String>,
        wf_purpose: WorkflowPurpose,
    ) -> Self {
        Workbook {
            wb_id: wb_id.into(),
            name: name.into(),
            wb_type: WorkbookType::Unknown,
            url: url.into(),
            fi_key: fi_key.into(),
            wf_key: wf_key.into(),
            wf_purpose,
            wf_folder: None,
            loaded: false,
            last_error: None,
        }
    }

    pub fn with_type(mut self, wb_type: WorkbookType) -> Self {
        self.wb_type = wb_type;
        self
    }

    pub fn with_folder(mut self, wf_folder: impl Into<String>) -> Self {
        self.wf_folder = Some(wf_folder.into());
        self
    }
}
