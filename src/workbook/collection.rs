//! Ordered workbook collection for one institution.
//!
//! Position order is defined as ascending sort by workbook id. The zero-based
//! "workbook index" is recomputed from the mapping on every query and is
//! never persisted; callers must not cache positions across mutations.

use crate::error::ContextError;
use crate::workbook::Workbook;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

/// Attribute selector for [`WorkbookCollection::find`]. `Id` and `Index` use
/// the direct lookups; all other attributes are a linear scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookAttr {
    Id,
    Index,
    Name,
    Type,
    WfKey,
    Purpose,
    Url,
}

/// Mapping from workbook id to record, iterated in ascending id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkbookCollection {
    entries: BTreeMap<String, Workbook>,
}

impl WorkbookCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, wb_id: &str) -> bool {
        self.entries.contains_key(wb_id)
    }

    pub fn get(&self, wb_id: &str) -> Option<&Workbook> {
        self.entries.get(wb_id)
    }

    pub fn get_mut(&mut self, wb_id: &str) -> Option<&mut Workbook> {
        self.entries.get_mut(wb_id)
    }

    /// Insert a record keyed by its own `wb_id`, replacing any prior entry
    /// with that id.
    pub fn insert(&mut self, workbook: Workbook) -> Option<Workbook> {
        self.entries.insert(workbook.wb_id.clone(), workbook)
    }

    /// Iterate records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Workbook> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fail-closed coherence check: every map key must equal its record's
    /// `wb_id`. An incoherent entry fails every positional query on the
    /// collection rather than silently misreporting positions.
    pub fn verify(&self) -> Result<(), ContextError> {
        for (key, workbook) in &self.entries {
            if key != &workbook.wb_id {
                error!(
                    key = %key,
                    wb_id = %workbook.wb_id,
                    "workbook collection entry key disagrees with record id"
                );
                return Err(ContextError::Configuration(format!(
                    "workbook collection entry '{key}' holds record with id '{}'",
                    workbook.wb_id
                )));
            }
        }
        Ok(())
    }

    /// Resolve the record at zero-based position `index` in ascending id
    /// order. The ordering is materialized on every call.
    pub fn by_index(&self, index: usize) -> Result<&Workbook, ContextError> {
        self.verify()?;
        self.entries.values().nth(index).ok_or_else(|| {
            ContextError::NotFound(format!(
                "workbook index {index} out of range (len {})",
                self.entries.len()
            ))
        })
    }

    /// Position of `wb_id` in ascending id order; `None` if absent.
    pub fn index_of(&self, wb_id: &str) -> Result<Option<usize>, ContextError> {
        self.verify()?;
        Ok(self.entries.keys().position(|key| key == wb_id))
    }

    /// Locate a record by attribute value. `Id` and `Index` short-circuit to
    /// the direct lookups; other attributes scan in id order and return the
    /// first match.
    pub fn find(&self, attr: WorkbookAttr, value: &str) -> Result<Option<&Workbook>, ContextError> {
        self.verify()?;
        match attr {
            WorkbookAttr::Id => Ok(self.entries.get(value)),
            WorkbookAttr::Index => {
                let index: usize = match value.parse() {
                    Ok(index) => index,
                    Err(_) => return Ok(None),
                };
                match self.by_index(index) {
                    Ok(workbook) => Ok(Some(workbook)),
                    Err(ContextError::NotFound(_)) => Ok(None),
                    Err(other) => Err(other),
                }
            }
            WorkbookAttr::Name => Ok(self.entries.values().find(|wb| wb.name == value)),
            WorkbookAttr::Type => Ok(self
                .entries
                .values()
                .find(|wb| wb.wb_type.as_str() == value)),
            WorkbookAttr::WfKey => Ok(self.entries.values().find(|wb| wb.wf_key == value)),
            WorkbookAttr::Purpose => Ok(self
                .entries
                .values()
                .find(|wb| wb.wf_purpose.as_str() == value)),
            WorkbookAttr::Url => Ok(self.entries.values().find(|wb| wb.url == value)),
        }
    }

    pub fn remove_by_id(&mut self, wb_id: &str) -> Option<Workbook> {
        self.entries.remove(wb_id)
    }

    /// Remove and return the record at position `index`. The caller is
    /// responsible for evicting any cached content for the removed id.
    pub fn remove_by_index(&mut self, index: usize) -> Result<Workbook, ContextError> {
        let wb_id = self.by_index(index)?.wb_id.clone();
        self.entries.remove(&wb_id).ok_or_else(|| {
            ContextError::NotFound(format!("workbook '{wb_id}' vanished during removal"))
        })
    }
}
