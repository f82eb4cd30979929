//! Backend registry

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::backend::Backend;
use super::inmemory::InMemoryBackend;
use crate::config::DEFAULT_BACKEND;
use crate::error::{ModelError, ModelResult};
use crate::observability::Event;
use crate::operations::OperationKind;

/// Named backends
///
/// Starts with a single in-memory backend named `"default"`. Intended to be
/// configured at setup time; lookups take a read lock only.
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Arc<dyn Backend>>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(default_table()),
        }
    }

    /// Register `backend` under `name`, replacing any previous entry
    pub fn configure(&self, name: &str, backend: Arc<dyn Backend>) -> ModelResult<()> {
        if name.is_empty() {
            return Err(ModelError::MissingBackendName);
        }

        let missing: Vec<OperationKind> = OperationKind::ALL
            .into_iter()
            .filter(|kind| !backend.supports(*kind))
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::IncompleteBackend {
                name: name.to_string(),
                missing,
            });
        }

        let mut backends = self
            .backends
            .write()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        backends.insert(name.to_string(), backend);

        tracing::info!(event = %Event::BackendConfigured, backend = %name);
        Ok(())
    }

    /// Look up a backend by name
    pub fn get(&self, name: &str) -> ModelResult<Arc<dyn Backend>> {
        if name.is_empty() {
            return Err(ModelError::MissingBackendName);
        }

        let backends = self
            .backends
            .read()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        backends
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::BackendNotConfigured(name.to_string()))
    }

    /// Snapshot of every configured backend
    pub fn get_all(&self) -> ModelResult<HashMap<String, Arc<dyn Backend>>> {
        self.backends
            .read()
            .map(|backends| backends.clone())
            .map_err(|_| ModelError::internal("Lock poisoned"))
    }

    /// Configured names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .backends
            .read()
            .map(|backends| backends.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Drop every backend and restore the default in-memory one
    pub fn reset(&self) -> ModelResult<()> {
        let mut backends = self
            .backends
            .write()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        *backends = default_table();

        tracing::info!(event = %Event::BackendsReset);
        Ok(())
    }
}

fn default_table() -> HashMap<String, Arc<dyn Backend>> {
    let mut table: HashMap<String, Arc<dyn Backend>> = HashMap::new();
    table.insert(DEFAULT_BACKEND.to_string(), Arc::new(InMemoryBackend::new()));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::DynamicBackend;

    #[test]
    fn test_starts_with_default() {
        let registry = BackendRegistry::new();
        assert_eq!(registry.names(), vec!["default"]);
        assert!(registry.get("default").is_ok());
    }

    #[test]
    fn test_empty_name() {
        let registry = BackendRegistry::new();
        assert!(matches!(registry.get(""), Err(ModelError::MissingBackendName)));
        assert!(matches!(
            registry.configure("", Arc::new(InMemoryBackend::new())),
            Err(ModelError::MissingBackendName)
        ));
    }

    #[test]
    fn test_unknown_name() {
        let registry = BackendRegistry::new();
        let err = registry.get("archive").err().unwrap();
        assert!(matches!(err, ModelError::BackendNotConfigured(ref n) if n == "archive"));
    }

    #[test]
    fn test_incomplete_backend_is_not_stored() {
        let registry = BackendRegistry::new();
        let err = registry
            .configure("partial", Arc::new(DynamicBackend::new()))
            .unwrap_err();

        match err {
            ModelError::IncompleteBackend { missing, .. } => {
                assert_eq!(missing, OperationKind::ALL.to_vec())
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.get("partial").is_err());
    }

    #[test]
    fn test_reset_restores_default_only() {
        let registry = BackendRegistry::new();
        registry
            .configure("other", Arc::new(InMemoryBackend::new()))
            .unwrap();
        assert_eq!(registry.get_all().unwrap().len(), 2);

        registry.reset().unwrap();
        assert_eq!(registry.names(), vec!["default"]);
    }
}
