//! Model manager
//!
//! Registry of model metadata. Owns the backend registry and the
//! configuration, and is the entry point for the four operations.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use super::loader::ModelLoader;
use super::meta::ModelMeta;
use super::model::Model;
use crate::backends::{Backend, BackendRegistry};
use crate::config::ModelsConfig;
use crate::error::{ModelError, ModelResult};
use crate::observability::Event;
use crate::operations::{
    self, CreateOptions, OperationResult, ReadOptions, RemoveOptions, UpdateOptions,
};

/// Registry of model types
pub struct ModelManager {
    config: ModelsConfig,
    models: RwLock<HashMap<String, Arc<ModelMeta>>>,
    backends: BackendRegistry,
}

impl Default for ModelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelManager {
    pub fn new() -> Self {
        Self::with_config(ModelsConfig::default())
    }

    pub fn with_config(config: ModelsConfig) -> Self {
        Self {
            config,
            models: RwLock::new(HashMap::new()),
            backends: BackendRegistry::new(),
        }
    }

    pub fn config(&self) -> &ModelsConfig {
        &self.config
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// Register a model type. Names are unique per manager.
    pub fn register(&self, meta: ModelMeta) -> ModelResult<()> {
        meta.validate_structure()?;

        let mut models = self
            .models
            .write()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        if models.contains_key(&meta.name) {
            return Err(ModelError::InvalidModelMeta {
                model: meta.name.clone(),
                reason: "a model with this name is already registered".into(),
            });
        }

        tracing::debug!(
            event = %Event::ModelRegistered,
            model = %meta.name,
            fields = meta.fields.len(),
        );
        for field in &meta.fields {
            field.freeze_rules();
        }
        models.insert(meta.name.clone(), Arc::new(meta));
        Ok(())
    }

    /// Load and register every definition in `dir`; returns the count
    pub fn load_dir(&self, dir: &Path) -> ModelResult<usize> {
        let definitions = ModelLoader::new(dir).load_all()?;
        let count = definitions.len();
        for meta in definitions {
            self.register(meta)?;
        }

        tracing::info!(event = %Event::ModelsLoaded, dir = %dir.display(), models = count);
        Ok(count)
    }

    pub fn get_model_meta(&self, model_name: &str) -> ModelResult<Arc<ModelMeta>> {
        let models = self
            .models
            .read()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        models
            .get(model_name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownModel(model_name.to_string()))
    }

    pub fn is_registered(&self, model_name: &str) -> bool {
        self.models
            .read()
            .map(|models| models.contains_key(model_name))
            .unwrap_or(false)
    }

    /// Registered model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .models
            .read()
            .map(|models| models.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn get_backend(&self, name: &str) -> ModelResult<Arc<dyn Backend>> {
        self.backends.get(name)
    }

    /// The backend storing `meta`'s records
    pub fn backend_for(&self, meta: &ModelMeta) -> ModelResult<Arc<dyn Backend>> {
        let name = meta
            .backend
            .as_deref()
            .unwrap_or(&self.config.default_backend);
        self.backends.get(name)
    }

    pub async fn create(&self, model: &Model, options: &CreateOptions) -> ModelResult<OperationResult> {
        operations::create(self, model, options).await
    }

    pub async fn update(&self, model: &Model, options: &UpdateOptions) -> ModelResult<OperationResult> {
        operations::update(self, model, options).await
    }

    pub async fn read(&self, model_name: &str, options: &ReadOptions) -> ModelResult<OperationResult> {
        operations::read(self, model_name, options).await
    }

    pub async fn remove(&self, model: &Model, options: &RemoveOptions) -> ModelResult<OperationResult> {
        operations::remove(self, model, options).await
    }
}
