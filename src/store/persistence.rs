//! Store document persistence.
//!
//! The engine consumes store loading through the `StoreLoader` trait; the
//! JSON implementation here covers `file://` and bare-path locators.

use crate::error::StorageError;
use crate::store::BudgetStore;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Load/save contract for the budget store document, used once during
/// initialization and on explicit save requests.
pub trait StoreLoader {
    fn load_store(&self, url: &str) -> Result<BudgetStore, StorageError>;

    fn save_store(&self, store: &BudgetStore, url: &str) -> Result<(), StorageError>;
}

/// Store loader over JSON documents on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct JsonStoreLoader;

impl JsonStoreLoader {
    pub fn new() -> Self {
        JsonStoreLoader
    }

    fn locator_path(url: &str) -> Result<PathBuf, StorageError> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if url.contains("://") {
            return Err(StorageError::UnsupportedLocator(url.to_string()));
        }
        Ok(PathBuf::from(url))
    }
}

impl StoreLoader for JsonStoreLoader {
    fn load_store(&self, url: &str) -> Result<BudgetStore, StorageError> {
        let path = Self::locator_path(url)?;
        debug!(url, path = %path.display(), "loading budget store document");
        if !path.exists() {
            return Err(StorageError::NotFound(url.to_string()));
        }
        let text = fs::read_to_string(&path)?;
        let store: BudgetStore = serde_json::from_str(&text)
            .map_err(|err| StorageError::Malformed(format!("{url}: {err}")))?;
        info!(url, institutions = store.institutions.len(), "budget store loaded");
        Ok(store)
    }

    fn save_store(&self, store: &BudgetStore, url: &str) -> Result<(), StorageError> {
        let path = Self::locator_path(url)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(store)?;
        fs::write(&path, text)?;
        info!(url, "budget store saved");
        Ok(())
    }
}
