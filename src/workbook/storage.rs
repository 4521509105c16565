//! Workbook storage collaborator seam.
//!
//! The engine never reads or writes workbook files itself; loading and
//! saving content is delegated through this trait. Locators are opaque
//! URL-like strings carried on the workbook record.

use crate::error::StorageError;
use crate::types::WorkbookContent;

/// Blocking load/save contract for workbook content.
///
/// Implementations may wrap asynchronous I/O internally; the engine models
/// each call as an atomic request/response pair.
pub trait WorkbookStorage {
    fn load(&self, locator: &str) -> Result<WorkbookContent, StorageError>;

    fn save(&self, content: &WorkbookContent, locator: &str) -> Result<(), StorageError>;
}
