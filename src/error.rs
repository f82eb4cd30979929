//! Error types for model operations
//!
//! Two disjoint classes:
//! - `ModelError::Validation`: the record failed validation. Expected and
//!   recoverable; carries the full operation result for display.
//! - Every other variant: fatal programmer or environment errors, surfaced
//!   immediately and never converted into field errors.

use thiserror::Error;

use crate::operations::{OperationKind, OperationResult};
use crate::validation::ValidationResult;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model layer errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("ValidationError: the model failed validation ({} field(s) with errors)", invalid_field_count(.0))]
    Validation(Box<OperationResult>),

    #[error("Specified model is not a registered model type: {0}")]
    UnknownModel(String),

    #[error("Model '{model}' has no field named '{field}'")]
    UnknownField { model: String, field: String },

    #[error("Invalid model definition '{model}': {reason}")]
    InvalidModelMeta { model: String, reason: String },

    #[error("Invalid field definition '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("BackendError: you must specify the name of the backend")]
    MissingBackendName,

    #[error("BackendError: Backend '{0}' has not been configured")]
    BackendNotConfigured(String),

    #[error("BackendError: backend '{name}' does not implement: {}", format_kinds(.missing))]
    IncompleteBackend {
        name: String,
        missing: Vec<OperationKind>,
    },

    #[error("{0}() requires a where clause when the model has no primary key value")]
    MissingWhereClause(OperationKind),

    #[error("Invalid where clause: {0}")]
    InvalidQuery(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Validator for '{field}' failed: {reason}")]
    ValidatorFailed { field: String, reason: String },

    #[error("ValidationError: validation timed out after {0}ms")]
    ValidationTimeout(u64),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn invalid_field_count(result: &OperationResult) -> usize {
    result
        .validation
        .as_ref()
        .map_or(0, |v| v.field_errors().len())
}

fn format_kinds(kinds: &[OperationKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ModelError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a validator failure
    pub fn validator_failed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidatorFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a validation failure rather than a fatal error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        !self.is_validation()
    }

    /// The operation result carried by a validation failure
    pub fn result(&self) -> Option<&OperationResult> {
        match self {
            Self::Validation(result) => Some(result),
            _ => None,
        }
    }

    /// The validation result carried by a validation failure
    pub fn validation(&self) -> Option<&ValidationResult> {
        self.result().and_then(|r| r.validation.as_ref())
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnknownModel(_) => "UNKNOWN_MODEL",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::InvalidModelMeta { .. } => "INVALID_MODEL_META",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::MissingBackendName => "MISSING_BACKEND_NAME",
            Self::BackendNotConfigured(_) => "BACKEND_NOT_CONFIGURED",
            Self::IncompleteBackend { .. } => "INCOMPLETE_BACKEND",
            Self::MissingWhereClause(_) => "MISSING_WHERE_CLAUSE",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidOptions(_) => "INVALID_OPTIONS",
            Self::ValidatorFailed { .. } => "VALIDATOR_FAILED",
            Self::ValidationTimeout(_) => "VALIDATION_TIMEOUT",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
