//! Model layer configuration
//!
//! Defaults applied beneath caller-supplied operation options. Loaded from a
//! JSON file; every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Name of the backend every registry starts with
pub const DEFAULT_BACKEND: &str = "default";

/// Model layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Backend used by model definitions that do not name one (default: "default")
    #[serde(default = "default_backend")]
    pub default_backend: String,

    /// Page size for `read()` when the caller gives none (default: 20)
    #[serde(default = "default_read_limit")]
    pub read_limit: usize,

    /// Upper bound on the async phase of a validation pass (default: 5000)
    #[serde(default = "default_validation_timeout_ms")]
    pub validation_timeout_ms: u64,

    /// Log filter directive (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

fn default_read_limit() -> usize {
    20
}

fn default_validation_timeout_ms() -> u64 {
    5000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default_backend: default_backend(),
            read_limit: default_read_limit(),
            validation_timeout_ms: default_validation_timeout_ms(),
            log_filter: default_log_filter(),
        }
    }
}

impl ModelsConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ModelResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ModelError::Config(format!("invalid config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> ModelResult<()> {
        if self.default_backend.is_empty() {
            return Err(ModelError::Config("default_backend must not be empty".into()));
        }
        if self.read_limit == 0 {
            return Err(ModelError::Config("read_limit must be at least 1".into()));
        }
        if self.validation_timeout_ms == 0 {
            return Err(ModelError::Config(
                "validation_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
