//! Validation orchestration
//!
//! Order of a model validation pass:
//! 1. undeclared keys on the instance (model errors)
//! 2. sync rules of every selected field, in field order
//! 3. async validators of every selected field, concurrently, under a timeout
//! 4. model-level sync validators, then model-level async validators
//!
//! An `Err` from any async validator aborts the pass.

use std::future::Future;
use std::time::Duration;

use futures_util::future::try_join_all;

use super::messages as msg;
use super::options::ValidationOptions;
use super::result::{SharedValidationResult, ValidationResult};
use super::validator::{FieldContext, FieldValidator, ModelContext};
use crate::error::{ModelError, ModelResult};
use crate::fields::FieldDef;
use crate::models::{Model, ModelManager, ModelMeta};
use crate::observability::Event;
use crate::operations::ModelOperation;

/// Validate a single field: built-in rules and custom sync validators in
/// registration order, then the field's async validators concurrently under
/// the validation timeout.
pub async fn validate_field(ctx: FieldContext<'_>, result: &mut ValidationResult) -> ModelResult<()> {
    run_sync_rules(&ctx, result);

    let async_validators = ctx.field.async_validators();
    if async_validators.is_empty() {
        return Ok(());
    }

    let timeout_ms = ctx
        .options
        .timeout_ms
        .unwrap_or(ctx.manager.config().validation_timeout_ms);
    let shared = SharedValidationResult::new(std::mem::take(result));
    let outcome = bounded(
        timeout_ms,
        try_join_all(async_validators.iter().map(|v| v.validate(ctx, &shared))),
    )
    .await;
    *result = shared.into_inner();
    outcome.map(|_| ())
}

/// Validate a model instance against its registered metadata
pub async fn validate(
    manager: &ModelManager,
    model: &Model,
    operation: &ModelOperation,
    options: &ValidationOptions,
) -> ModelResult<ValidationResult> {
    let meta = manager.get_model_meta(&model.model)?;
    let fields = select_fields(&meta, options)?;
    let timeout_ms = options
        .timeout_ms
        .unwrap_or(manager.config().validation_timeout_ms);

    tracing::debug!(
        event = %Event::ValidationBegin,
        model = %meta.name,
        operation = %operation.kind,
        operation_id = %operation.id,
        fields = fields.len(),
    );

    let mut result = ValidationResult::new();

    for key in model.keys() {
        if meta.field(key).is_none() {
            result.add_model_error(msg::extra_field(key), Some(msg::EXTRA_FIELD));
        }
    }

    let contexts: Vec<FieldContext<'_>> = fields
        .iter()
        .map(|&field| FieldContext {
            manager,
            model,
            field,
            operation,
            options,
        })
        .collect();

    for ctx in &contexts {
        run_sync_rules(ctx, &mut result);
    }

    let shared = SharedValidationResult::new(result);
    {
        let shared = &shared;
        let pending: Vec<_> = contexts
            .iter()
            .flat_map(|ctx| {
                ctx.field
                    .async_validators()
                    .iter()
                    .map(move |v| v.validate(*ctx, shared))
            })
            .collect();
        if !pending.is_empty() {
            bounded(timeout_ms, try_join_all(pending)).await?;
        }
    }
    let mut result = shared.into_inner();

    let model_ctx = ModelContext {
        manager,
        model,
        meta: meta.as_ref(),
        operation,
        options,
    };
    for validator in meta.validators() {
        validator.validate(&model_ctx, &mut result);
    }

    if !meta.async_validators().is_empty() {
        let shared = SharedValidationResult::new(result);
        {
            let shared = &shared;
            let pending = meta
                .async_validators()
                .iter()
                .map(|v| v.validate(model_ctx, shared));
            bounded(timeout_ms, try_join_all(pending)).await?;
        }
        result = shared.into_inner();
    }

    tracing::debug!(
        event = %Event::ValidationComplete,
        model = %meta.name,
        operation = %operation.kind,
        operation_id = %operation.id,
        valid = result.valid(),
        errors = result.error_count(),
    );

    Ok(result)
}

fn run_sync_rules(ctx: &FieldContext<'_>, result: &mut ValidationResult) {
    for rule in ctx.field.rules().iter() {
        rule.validate(ctx, result);
    }
    for validator in ctx.field.validators() {
        validator.validate(ctx, result);
    }
}

/// Fields to validate, in declaration order
fn select_fields<'m>(meta: &'m ModelMeta, options: &ValidationOptions) -> ModelResult<Vec<&'m FieldDef>> {
    let Some(names) = &options.fields else {
        return Ok(meta.fields.iter().collect());
    };

    for name in names {
        if meta.field(name).is_none() {
            return Err(ModelError::UnknownField {
                model: meta.name.clone(),
                field: name.clone(),
            });
        }
    }

    Ok(meta
        .fields
        .iter()
        .filter(|f| names.iter().any(|n| *n == f.name))
        .collect())
}

async fn bounded<T, F>(timeout_ms: u64, fut: F) -> ModelResult<T>
where
    F: Future<Output = ModelResult<T>>,
{
    tokio::time::timeout(Duration::from_millis(timeout_ms), fut)
        .await
        .map_err(|_| ModelError::ValidationTimeout(timeout_ms))?
}
