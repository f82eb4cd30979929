//! Validation result aggregation
//!
//! A result is built during one validation pass and frozen once returned.
//! `valid` is true iff there are no field errors and no model errors.

use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single failure on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// A failure spanning the whole model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Outcome of one validation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    field_errors: IndexMap<String, Vec<FieldError>>,
    model_errors: Vec<ModelValidationError>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            field_errors: IndexMap::new(),
            model_errors: Vec::new(),
        }
    }

    /// Record a failure on `field`. Errors keep call order within a field.
    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.push_field_error(field.into(), message.into(), code.into(), None);
    }

    /// Record a failure on `field` with extra machine-readable data
    pub fn add_field_error_with(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
        extra: Value,
    ) {
        self.push_field_error(field.into(), message.into(), code.into(), Some(extra));
    }

    fn push_field_error(&mut self, field: String, message: String, code: String, extra: Option<Value>) {
        self.field_errors.entry(field).or_default().push(FieldError {
            message,
            code,
            extra,
        });
        self.valid = false;
    }

    /// Record a failure that spans the whole model
    pub fn add_model_error(&mut self, message: impl Into<String>, code: Option<&str>) {
        self.push_model_error(message.into(), code.map(str::to_string), None);
    }

    pub fn add_model_error_with(
        &mut self,
        message: impl Into<String>,
        code: Option<&str>,
        extra: Value,
    ) {
        self.push_model_error(message.into(), code.map(str::to_string), Some(extra));
    }

    fn push_model_error(&mut self, message: String, code: Option<String>, extra: Option<Value>) {
        self.model_errors.push(ModelValidationError {
            message,
            code,
            extra,
        });
        self.valid = false;
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Field errors in the order fields first failed
    pub fn field_errors(&self) -> &IndexMap<String, Vec<FieldError>> {
        &self.field_errors
    }

    /// Errors for one field; `None` when the field has none
    pub fn errors_for(&self, field: &str) -> Option<&[FieldError]> {
        self.field_errors.get(field).map(Vec::as_slice)
    }

    pub fn model_errors(&self) -> &[ModelValidationError] {
        &self.model_errors
    }

    /// Whether `field` has an error with `code`
    pub fn has_error(&self, field: &str, code: &str) -> bool {
        self.errors_for(field)
            .is_some_and(|errors| errors.iter().any(|e| e.code == code))
    }

    /// Every `(field, code)` pair, field errors first; model errors use `""`
    /// as their field
    pub fn error_codes(&self) -> Vec<(String, String)> {
        let mut codes: Vec<(String, String)> = self
            .field_errors
            .iter()
            .flat_map(|(field, errors)| errors.iter().map(move |e| (field.clone(), e.code.clone())))
            .collect();
        codes.extend(
            self.model_errors
                .iter()
                .map(|e| (String::new(), e.code.clone().unwrap_or_default())),
        );
        codes
    }

    /// Total number of recorded errors
    pub fn error_count(&self) -> usize {
        self.field_errors.values().map(Vec::len).sum::<usize>() + self.model_errors.len()
    }
}

/// A validation result shared between concurrently running async validators
///
/// The lock is only held while an error is appended, never across an await.
#[derive(Debug, Default)]
pub struct SharedValidationResult {
    inner: Mutex<ValidationResult>,
}

impl SharedValidationResult {
    pub fn new(result: ValidationResult) -> Self {
        Self {
            inner: Mutex::new(result),
        }
    }

    pub fn add_field_error(
        &self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.with(|r| r.add_field_error(field, message, code));
    }

    pub fn add_field_error_with(
        &self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
        extra: Value,
    ) {
        self.with(|r| r.add_field_error_with(field, message, code, extra));
    }

    pub fn add_model_error(&self, message: impl Into<String>, code: Option<&str>) {
        self.with(|r| r.add_model_error(message, code));
    }

    pub fn valid(&self) -> bool {
        self.with(|r| r.valid())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ValidationResult {
        self.with(|r| r.clone())
    }

    pub fn into_inner(self) -> ValidationResult {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn with<T>(&self, f: impl FnOnce(&mut ValidationResult) -> T) -> T {
        // A panicking validator leaves the result usable; errors are append-only.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_result_is_valid() {
        let result = ValidationResult::new();
        assert!(result.valid());
        assert!(result.field_errors().is_empty());
        assert!(result.model_errors().is_empty());
    }

    #[test]
    fn test_field_error_invalidates() {
        let mut result = ValidationResult::new();
        result.add_field_error("name", "name is required", "required");

        assert!(!result.valid());
        assert!(result.has_error("name", "required"));
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_model_error_invalidates() {
        let mut result = ValidationResult::new();
        result.add_model_error("dates overlap", Some("overlap"));

        assert!(!result.valid());
        assert!(result.field_errors().is_empty());
        assert_eq!(result.model_errors()[0].code.as_deref(), Some("overlap"));
    }

    #[test]
    fn test_errors_keep_call_order_without_dedup() {
        let mut result = ValidationResult::new();
        result.add_field_error("code", "first", "a");
        result.add_field_error("code", "second", "b");
        result.add_field_error("code", "second", "b");

        let codes: Vec<&str> = result
            .errors_for("code")
            .unwrap()
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, vec!["a", "b", "b"]);
    }

    #[test]
    fn test_fields_without_errors_are_absent() {
        let mut result = ValidationResult::new();
        result.add_field_error("b", "bad", "x");

        assert!(result.errors_for("a").is_none());
        assert_eq!(result.field_errors().len(), 1);
    }

    #[test]
    fn test_field_order_is_first_failure_order() {
        let mut result = ValidationResult::new();
        result.add_field_error("zeta", "bad", "x");
        result.add_field_error("alpha", "bad", "x");
        result.add_field_error("zeta", "worse", "y");

        let fields: Vec<&String> = result.field_errors().keys().collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_extra_is_serialized() {
        let mut result = ValidationResult::new();
        result.add_field_error_with("age", "too low", "min_value", json!({"min": 18}));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["field_errors"]["age"][0]["extra"]["min"], 18);
    }

    #[test]
    fn test_shared_result_collects_from_threads() {
        let shared = std::sync::Arc::new(SharedValidationResult::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.add_field_error("f", format!("error {}", i), "x");
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let result = std::sync::Arc::try_unwrap(shared).unwrap().into_inner();
        assert_eq!(result.errors_for("f").unwrap().len(), 4);
        assert!(!result.valid());
    }
}
