//! Error types for the budget data context engine.

use thiserror::Error;

/// Storage collaborator errors.
///
/// Raised by the `StoreLoader` and `WorkbookStorage` seams; the engine
/// itself performs no I/O.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no content at locator: {0}")]
    NotFound(String),

    #[error("unsupported locator: {0}")]
    UnsupportedLocator(String),

    #[error("malformed store document: {0}")]
    Malformed(String),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Data context errors.
///
/// `Configuration` is fatal and surfaced immediately. `Validation` and
/// `State` are recoverable: setters reject and leave prior state unchanged,
/// getters return `None` instead of erroring.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation failed for {field}: {value:?}")]
    Validation { field: &'static str, value: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("context not ready: {0}")]
    State(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl ContextError {
    /// Shorthand for a `Validation` rejection of a candidate value.
    pub fn validation(field: &'static str, value: impl Into<String>) -> Self {
        ContextError::Validation {
            field,
            value: value.into(),
        }
    }
}

impl From<config::ConfigError> for ContextError {
    fn from(err: config::ConfigError) -> Self {
        ContextError::Configuration(err.to_string())
    }
}
