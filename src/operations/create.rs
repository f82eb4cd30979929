//! Create pipeline

use super::operation::{ModelOperation, OperationKind};
use super::options::CreateOptions;
use super::pipeline::{observed, validation_options};
use super::result::OperationResult;
use crate::error::ModelResult;
use crate::models::{Model, ModelManager};
use crate::validation::validate;

/// Validate `model` and, if valid, store it through its backend.
///
/// An invalid model fails with `ModelError::Validation`; the backend is
/// never called in that case.
pub async fn create(
    manager: &ModelManager,
    model: &Model,
    options: &CreateOptions,
) -> ModelResult<OperationResult> {
    let operation = ModelOperation::new(OperationKind::Create);
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
    options: &CreateOptions,
) -> ModelResult<OperationResult> {
    let meta = manager.get_model_meta(&model.model)?;
    let backend = manager.backend_for(&meta)?;

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

    backend.create(manager, model, &mut result, options).await?;
    Ok(result)
}
