//! Application settings.
//!
//! Layered configuration: built-in defaults, then an optional TOML settings
//! file, then `TALLY_*` environment overrides. The settings name the store
//! document to open and the selection defaults to fall back on when the
//! store carries none of its own.

use crate::error::ContextError;
use crate::logging::LoggingConfig;
use crate::store::BudgetStore;
use crate::types::WorkflowPurpose;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fallback selection defaults, used when the store document's own
/// persisted defaults are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionDefaults {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub purpose: Option<WorkflowPurpose>,
}

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Locator of the budget store document (file:// or bare path).
    #[serde(default)]
    pub store_url: Option<String>,

    #[serde(default)]
    pub defaults: SelectionDefaults,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TallyConfig {
    /// Validate the loaded settings; fails fast with a configuration
    /// error rather than surfacing problems at first use.
    pub fn validate(&self) -> Result<(), ContextError> {
        if let Some(url) = self.store_url.as_deref() {
            if url.is_empty() {
                return Err(ContextError::Configuration(
                    "store_url must not be empty".to_string(),
                ));
            }
            if url.contains("://") && !url.starts_with("file://") {
                return Err(ContextError::Configuration(format!(
                    "unsupported store_url scheme: {url}"
                )));
            }
        }
        Ok(())
    }

    /// Fill in store selection defaults the document does not carry
    /// itself. The store's own persisted defaults always win; these are
    /// the fallbacks.
    pub fn apply_fallback_defaults(&self, store: &mut BudgetStore) {
        let dc = &mut store.data_context;
        if dc.fi_key.is_none() {
            dc.fi_key = self.defaults.institution.clone();
        }
        if dc.wf_key.is_none() {
            dc.wf_key = self.defaults.workflow.clone();
        }
        if dc.wf_purpose.is_none() {
            dc.wf_purpose = self.defaults.purpose;
        }
    }
}

/// Load settings from the given file (or `tally.toml` in the working
/// directory when absent), with `TALLY_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<TallyConfig, ContextError> {
    let mut builder = Config::builder();
    builder = match path {
        Some(path) => builder.add_source(File::from(path)),
        None => builder.add_source(File::with_name("tally").required(false)),
    };
    builder = builder.add_source(Environment::with_prefix("TALLY").separator("__"));

    let settings: TallyConfig = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
