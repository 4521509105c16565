//! Content cache: workbook id to loaded in-memory content.
//!
//! Load and save delegate to the injected storage collaborator. The
//! ordering contract for `put` is save-then-cache: the cache never shows a
//! workbook as loaded unless the underlying save itself reported success.

use crate::error::ContextError;
use crate::types::WorkbookContent;
use crate::workbook::{Workbook, WorkbookStorage};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info};

/// Transient per-run cache of loaded workbook content, keyed by workbook
/// id. At most one entry per id; `put` replaces wholesale.
pub struct ContentCache {
    entries: HashMap<String, WorkbookContent>,
    storage: Box<dyn WorkbookStorage>,
}

impl fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache")
            .field("entries", &self.entries.keys())
            .finish_non_exhaustive()
    }
}

impl ContentCache {
    pub fn new(storage: Box<dyn WorkbookStorage>) -> Self {
        ContentCache {
            entries: HashMap::new(),
            storage,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_cached(&self, wb_id: &str) -> bool {
        self.entries.contains_key(wb_id)
    }

    pub fn cached(&self, wb_id: &str) -> Option<&WorkbookContent> {
        self.entries.get(wb_id)
    }

    /// Get content for `record`. Without `force_load` this only consults
    /// the cache; with it, content is (re)loaded through the storage
    /// collaborator, cached, and the record marked loaded.
    pub fn get(
        &mut self,
        record: &mut Workbook,
        force_load: bool,
    ) -> Result<&WorkbookContent, ContextError> {
        if !force_load {
            return match self.entries.get(&record.wb_id) {
                Some(content) => Ok(content),
                None => {
                    debug!(op = "content_get", wb_id = %record.wb_id, "content not loaded");
                    Err(ContextError::NotFound(format!(
                        "workbook '{}' has no loaded content",
                        record.wb_id
                    )))
                }
            };
        }
        match self.storage.load(&record.url) {
            Ok(content) => {
                record.loaded = true;
                record.last_error = None;
                info!(wb_id = %record.wb_id, url = %record.url, "workbook content loaded");
                let slot = self.entries.entry(record.wb_id.clone()).or_default();
                *slot = content;
                Ok(slot)
            }
            Err(err) => {
                // Failed load leaves the record unloaded and the cache
                // untouched.
                record.last_error = Some(err.to_string());
                error!(op = "content_get", wb_id = %record.wb_id, url = %record.url, %err,
                    "workbook load failed");
                Err(err.into())
            }
        }
    }

    /// Put content for `record`: save through the storage collaborator
    /// first, and only on success replace the cache entry and mark the
    /// record loaded. A failed save leaves the previous cache state
    /// untouched.
    pub fn put(
        &mut self,
        content: WorkbookContent,
        record: &mut Workbook,
    ) -> Result<(), ContextError> {
        if let Err(err) = self.storage.save(&content, &record.url) {
            record.last_error = Some(err.to_string());
            error!(op = "content_put", wb_id = %record.wb_id, url = %record.url, %err,
                "workbook save failed; cache left unchanged");
            return Err(err.into());
        }
        self.entries.insert(record.wb_id.clone(), content);
        record.loaded = true;
        record.last_error = None;
        info!(wb_id = %record.wb_id, url = %record.url, "workbook content saved");
        Ok(())
    }

    /// Save the cached entry for `record` through the storage collaborator.
    /// Fails when nothing is cached for the record's id; a failed save
    /// leaves both the cache and the record's loaded flag unchanged.
    pub fn save_cached(&mut self, record: &mut Workbook) -> Result<(), ContextError> {
        let Some(content) = self.entries.get(&record.wb_id) else {
            debug!(op = "workbook_save", wb_id = %record.wb_id, "no loaded content to save");
            return Err(ContextError::NotFound(format!(
                "workbook '{}' has no loaded content to save",
                record.wb_id
            )));
        };
        if let Err(err) = self.storage.save(content, &record.url) {
            record.last_error = Some(err.to_string());
            error!(op = "workbook_save", wb_id = %record.wb_id, url = %record.url, %err,
                "workbook save failed");
            return Err(err.into());
        }
        record.loaded = true;
        record.last_error = None;
        info!(wb_id = %record.wb_id, url = %record.url, "cached workbook content saved");
        Ok(())
    }

    /// Remove the cache entry for `wb_id` without touching storage.
    /// Idempotent: evicting an absent id is a no-op.
    pub fn evict(&mut self, wb_id: &str) -> bool {
        let existed = self.entries.remove(wb_id).is_some();
        if existed {
            debug!(wb_id, "cache entry evicted");
        }
        existed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::types::WorkflowPurpose;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct ScriptedStorage {
        contents: RefCell<HashMap<String, WorkbookContent>>,
        fail_loads: Cell<bool>,
        fail_saves: Cell<bool>,
    }

    impl WorkbookStorage for Rc<ScriptedStorage> {
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
            self.contents
                .borrow_mut()
                .insert(locator.to_string(), content.clone());
            Ok(())
        }
    }

    fn record() -> Workbook {
        Workbook::new(
            "working|txns.xlsx",
            "txns.xlsx",
            "file:///budget/boa/working/txns.xlsx",
            "boa",
            "intake",
            WorkflowPurpose::Working,
        )
    }

    fn cache_with_storage() -> (ContentCache, Rc<ScriptedStorage>) {
        let storage = Rc::new(ScriptedStorage::default());
        (ContentCache::new(Box::new(Rc::clone(&storage))), storage)
    }

    #[test]
    fn get_without_force_misses_when_not_loaded() {
        let (mut cache, _storage) = cache_with_storage();
        let mut wb = record();
        assert!(matches!(
            cache.get(&mut wb, false),
            Err(ContextError::NotFound(_))
        ));
        assert!(!wb.loaded);
    }

    #[test]
    fn forced_get_loads_and_marks_record() {
        let (mut cache, storage) = cache_with_storage();
        let mut wb = record();
        storage
            .contents
            .borrow_mut()
            .insert(wb.url.clone(), json!({"rows": 3}));

        let content = cache.get(&mut wb, true).unwrap().clone();
        assert_eq!(content, json!({"rows": 3}));
        assert!(wb.loaded);
        assert!(cache.is_cached(&wb.wb_id));
    }

    #[test]
    fn failed_load_leaves_no_entry() {
        let (mut cache, storage) = cache_with_storage();
        storage.fail_loads.set(true);
        let mut wb = record();

        assert!(matches!(
            cache.get(&mut wb, true),
            Err(ContextError::Storage(_))
        ));
        assert!(!wb.loaded);
        assert!(!cache.is_cached(&wb.wb_id));
        assert!(wb.last_error.is_some());
    }

    #[test]
    fn failed_save_leaves_prior_entry_untouched() {
        let (mut cache, storage) = cache_with_storage();
        let mut wb = record();
        cache.put(json!({"version": 1}), &mut wb).unwrap();

        storage.fail_saves.set(true);
        let err = cache.put(json!({"version": 2}), &mut wb).unwrap_err();
        assert!(matches!(err, ContextError::Storage(_)));
        assert_eq!(cache.cached(&wb.wb_id), Some(&json!({"version": 1})));
    }

    #[test]
    fn put_then_get_round_trips() {
        let (mut cache, _storage) = cache_with_storage();
        let mut wb = record();
        cache.put(json!({"rows": [1, 2]}), &mut wb).unwrap();
        let content = cache.get(&mut wb, false).unwrap();
        assert_eq!(content, &json!({"rows": [1, 2]}));
        assert!(wb.loaded);
    }

    #[test]
    fn evict_is_idempotent() {
        let (mut cache, _storage) = cache_with_storage();
        let mut wb = record();
        cache.put(json!({}), &mut wb).unwrap();

        assert!(cache.evict(&wb.wb_id));
        assert!(!cache.evict(&wb.wb_id));
        assert!(!cache.is_cached(&wb.wb_id));
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}
