//! Operation results

use serde::Serialize;

use super::operation::ModelOperation;
use crate::error::ModelError;
use crate::models::Model;
use crate::validation::{messages, ValidationResult};

/// An operation-level error (as opposed to a field or model validation error)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Paging and count information reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationMeta {
    /// Records matched (read) or affected (update, remove)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Outcome of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub operation: ModelOperation,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    /// The created or updated record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Model>,
    /// Records returned by read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Model>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OperationError>,
    pub meta: OperationMeta,
}

impl OperationResult {
    pub fn new(operation: ModelOperation) -> Self {
        Self {
            operation,
            success: true,
            validation: None,
            result: None,
            results: None,
            errors: Vec::new(),
            meta: OperationMeta::default(),
        }
    }

    /// Record an operation-level error; marks the result unsuccessful
    pub fn add_error(&mut self, message: impl Into<String>, code: Option<&str>) {
        self.errors.push(OperationError {
            message: message.into(),
            code: code.map(str::to_string),
        });
        self.success = false;
    }

    /// Turn this result into the error returned for a failed validation
    pub fn into_validation_error(mut self, validation: ValidationResult) -> ModelError {
        self.add_error(messages::validation_error(), Some(messages::VALIDATION_ERROR));
        self.validation = Some(validation);
        ModelError::Validation(Box::new(self))
    }
}
