//! Validator contracts
//!
//! Synchronous validators write into a `&mut ValidationResult`. Asynchronous
//! validators may run concurrently with each other and write through a
//! [`SharedValidationResult`]. Both report ordinary failures as errors on the
//! result; an `Err` from an async validator aborts the whole operation.

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::options::ValidationOptions;
use super::result::{SharedValidationResult, ValidationResult};
use crate::error::ModelResult;
use crate::fields::FieldDef;
use crate::models::{Model, ModelManager, ModelMeta};
use crate::operations::ModelOperation;

/// Everything a field validator can see
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    pub manager: &'a ModelManager,
    pub model: &'a Model,
    pub field: &'a FieldDef,
    pub operation: &'a ModelOperation,
    pub options: &'a ValidationOptions,
}

impl<'a> FieldContext<'a> {
    /// The field's value on the model, `None` when absent or null
    pub fn value(&self) -> Option<&'a Value> {
        self.model.get_set(&self.field.name)
    }

    /// The raw value, `Some(Null)` for an explicit null
    pub fn raw_value(&self) -> Option<&'a Value> {
        self.model.get(&self.field.name)
    }
}

/// Everything a model-level validator can see
#[derive(Clone, Copy)]
pub struct ModelContext<'a> {
    pub manager: &'a ModelManager,
    pub model: &'a Model,
    pub meta: &'a ModelMeta,
    pub operation: &'a ModelOperation,
    pub options: &'a ValidationOptions,
}

/// A synchronous check of one field
pub trait FieldValidator: Send + Sync {
    fn validate(&self, ctx: &FieldContext<'_>, result: &mut ValidationResult);
}

/// An asynchronous check of one field (e.g. a uniqueness lookup)
pub trait AsyncFieldValidator: Send + Sync {
    fn validate<'a>(
        &'a self,
        ctx: FieldContext<'a>,
        result: &'a SharedValidationResult,
    ) -> BoxFuture<'a, ModelResult<()>>;
}

/// A synchronous rule spanning several fields
pub trait ModelValidator: Send + Sync {
    fn validate(&self, ctx: &ModelContext<'_>, result: &mut ValidationResult);
}

/// An asynchronous rule spanning several fields
pub trait AsyncModelValidator: Send + Sync {
    fn validate<'a>(
        &'a self,
        ctx: ModelContext<'a>,
        result: &'a SharedValidationResult,
    ) -> BoxFuture<'a, ModelResult<()>>;
}

/// Closure adapter for [`FieldValidator`]
pub struct FnFieldValidator<F>(F);

impl<F> FnFieldValidator<F>
where
    F: Fn(&FieldContext<'_>, &mut ValidationResult) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> FieldValidator for FnFieldValidator<F>
where
    F: Fn(&FieldContext<'_>, &mut ValidationResult) + Send + Sync,
{
    fn validate(&self, ctx: &FieldContext<'_>, result: &mut ValidationResult) {
        (self.0)(ctx, result)
    }
}

/// Closure adapter for [`ModelValidator`]
pub struct FnModelValidator<F>(F);

impl<F> FnModelValidator<F>
where
    F: Fn(&ModelContext<'_>, &mut ValidationResult) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ModelValidator for FnModelValidator<F>
where
    F: Fn(&ModelContext<'_>, &mut ValidationResult) + Send + Sync,
{
    fn validate(&self, ctx: &ModelContext<'_>, result: &mut ValidationResult) {
        (self.0)(ctx, result)
    }
}
