//! Validation
//!
//! Built-in rules, custom validator traits, the result aggregator and the
//! orchestrators that run them against a model instance.

pub mod messages;
mod options;
mod orchestrator;
mod result;
mod rules;
mod validator;

pub use options::ValidationOptions;
pub use orchestrator::{validate, validate_field};
pub use result::{FieldError, ModelValidationError, SharedValidationResult, ValidationResult};
pub use rules::Rule;
pub use validator::{
    AsyncFieldValidator, AsyncModelValidator, FieldContext, FieldValidator, FnFieldValidator,
    FnModelValidator, ModelContext, ModelValidator,
};

pub(crate) use rules::js_compare;
