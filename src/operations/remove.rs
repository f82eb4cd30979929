//! Remove pipeline

use super::operation::{ModelOperation, OperationKind};
use super::options::RemoveOptions;
use super::pipeline::{observed, resolve_where, validation_options};
use super::result::OperationResult;
use crate::error::ModelResult;
use crate::models::{Model, ModelManager};
use crate::validation::validate;

/// Validate `model` and delete every matching record.
///
/// Records are selected by `options.where_clause`, or by the model's
/// primary key value when no clause is given.
pub async fn remove(
    manager: &ModelManager,
    model: &Model,
    options: &RemoveOptions,
) -> ModelResult<OperationResult> {
    let operation = ModelOperation::new(OperationKind::Remove);
    observed(
        &model.model,
        operation.kind,
        operation.id,
        run(manager, model, operation, options),
    )
    .await
}

async fn run(
    manager: &ModelManager,
    model: &Model,
    operation: ModelOperation,
    options: &RemoveOptions,
) -> ModelResult<OperationResult> {
    let meta = manager.get_model_meta(&model.model)?;
    let backend = manager.backend_for(&meta)?;

    let where_clause = resolve_where(
        &meta,
        model,
        options.where_clause.as_ref(),
        OperationKind::Remove,
    )?;
    let operation = operation.with_where(where_clause.clone());

    let validation_opts = validation_options(
        options.validation.as_ref(),
        manager.config().validation_timeout_ms,
    );
    let validation = validate(manager, model, &operation, &validation_opts).await?;

    let mut result = OperationResult::new(operation);
    if !validation.valid() {
        return Err(result.into_validation_error(validation));
    }
    result.validation = Some(validation);

    let resolved = RemoveOptions {
        where_clause: Some(where_clause),
        validation: Some(validation_opts),
    };
    backend.remove(manager, model, &mut result, &resolved).await?;
    Ok(result)
}
