//! Model metadata
//!
//! Describes one model type: its fields, the backend that stores it and any
//! validators spanning several fields. Metadata is checked once when it is
//! registered and is immutable afterwards.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::fields::FieldDef;
use crate::validation::{
    AsyncModelValidator, FnModelValidator, ModelContext, ModelValidator, ValidationResult,
};

/// Metadata for a model type
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Model type name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Backend name; the configured default backend when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// Field identifying a single record for update and remove
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,

    pub fields: Vec<FieldDef>,

    #[serde(skip)]
    validators: Vec<Arc<dyn ModelValidator>>,

    #[serde(skip)]
    async_validators: Vec<Arc<dyn AsyncModelValidator>>,
}

impl ModelMeta {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            label: None,
            backend: None,
            primary_key: None,
            fields,
            validators: Vec::new(),
            async_validators: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    /// Attach a model-level validator; runs after all field validation
    pub fn with_validator(mut self, validator: impl ModelValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn with_validator_fn<F>(self, f: F) -> Self
    where
        F: Fn(&ModelContext<'_>, &mut ValidationResult) + Send + Sync + 'static,
    {
        self.with_validator(FnModelValidator::new(f))
    }

    pub fn with_async_validator(mut self, validator: impl AsyncModelValidator + 'static) -> Self {
        self.async_validators.push(Arc::new(validator));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn validators(&self) -> &[Arc<dyn ModelValidator>] {
        &self.validators
    }

    pub fn async_validators(&self) -> &[Arc<dyn AsyncModelValidator>] {
        &self.async_validators
    }

    /// Checks the definition: names present and unique, primary key
    /// declared, every field definition consistent.
    pub fn validate_structure(&self) -> ModelResult<()> {
        let invalid = |reason: String| ModelError::InvalidModelMeta {
            model: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("model name must not be empty".into()));
        }

        if self.backend.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(invalid("backend name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.check()?;
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
        }

        if let Some(pk) = &self.primary_key {
            if self.field(pk).is_none() {
                return Err(invalid(format!(
                    "primary key '{}' is not a declared field",
                    pk
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ModelMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMeta")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("backend", &self.backend)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields)
            .field("validators", &self.validators.len())
            .field("async_validators", &self.async_validators.len())
            .finish()
    }
}
