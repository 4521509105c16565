//! Shared types for the budget design language: workflow purposes, workbook
//! type tags, and the opaque workbook content alias.

use serde::{Deserialize, Serialize};
use std::fmt;

/// In-memory workbook content. Opaque to the engine: it is produced and
/// consumed by the storage collaborator and cached by workbook id.
pub type WorkbookContent = serde_json::Value;

/// Reserved wildcard key meaning "all workbooks". Never a valid single
/// workflow key; setters reject it with a typed validation error.
pub const RESERVED_WORKFLOW_ALL: &str = "all";

/// The role a workbook plays within a workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPurpose {
    Input,
    Working,
    Output,
}

impl WorkflowPurpose {
    /// The accepted purpose values, the configuration constant validators
    /// check candidates against.
    pub const ALL: [WorkflowPurpose; 3] = [
        WorkflowPurpose::Input,
        WorkflowPurpose::Working,
        WorkflowPurpose::Output,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPurpose::Input => "input",
            WorkflowPurpose::Working => "working",
            WorkflowPurpose::Output => "output",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "input" => Some(WorkflowPurpose::Input),
            "working" => Some(WorkflowPurpose::Working),
            "output" => Some(WorkflowPurpose::Output),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag describing what kind of data a workbook carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkbookType {
    Store,
    Config,
    TxnRegister,
    ExcelTxns,
    TxnCategories,
    Budget,
    #[default]
    Unknown,
}

impl WorkbookType {
    /// The accepted type tags, the configuration constant validators check
    /// candidates against.
    pub const ALL: [WorkbookType; 7] = [
        WorkbookType::Store,
        WorkbookType::Config,
        WorkbookType::TxnRegister,
        WorkbookType::ExcelTxns,
        WorkbookType::TxnCategories,
        WorkbookType::Budget,
        WorkbookType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkbookType::Store => "store",
            WorkbookType::Config => "config",
            WorkbookType::TxnRegister => "txn_register",
            WorkbookType::ExcelTxns => "excel_txns",
            WorkbookType::TxnCategories => "txn_categories",
            WorkbookType::Budget => "budget",
            WorkbookType::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "store" => Some(WorkbookType::Store),
            "config" => Some(WorkbookType::Config),
            "txn_register" => Some(WorkbookType::TxnRegister),
            "excel_txns" => Some(WorkbookType::ExcelTxns),
            "txn_categories" => Some(WorkbookType::TxnCategories),
            "budget" => Some(WorkbookType::Budget),
            "unknown" => Some(WorkbookType::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for WorkbookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
