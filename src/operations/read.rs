//! Read pipeline

use super::operation::{ModelOperation, OperationKind};
use super::options::ReadOptions;
use super::pipeline::{check_where_fields, observed};
use super::result::OperationResult;
use crate::error::{ModelError, ModelResult};
use crate::models::ModelManager;
use crate::query::WhereQuery;

/// Fetch records of `model_name`. No validation runs.
pub async fn read(
    manager: &ModelManager,
    model_name: &str,
    options: &ReadOptions,
) -> ModelResult<OperationResult> {
    let operation = ModelOperation::new(OperationKind::Read);
    observed(
        model_name,
        operation.kind,
        operation.id,
        run(manager, model_name, operation, options),
    )
    .await
}

async fn run(
    manager: &ModelManager,
    model_name: &str,
    operation: ModelOperation,
    options: &ReadOptions,
) -> ModelResult<OperationResult> {
    let meta = manager.get_model_meta(model_name)?;
    let backend = manager.backend_for(&meta)?;

    let limit = options.limit.unwrap_or(manager.config().read_limit);
    if limit < 1 {
        return Err(ModelError::InvalidOptions("limit must be at least 1".into()));
    }

    for (field, _) in options.sort_keys()? {
        if meta.field(field).is_none() {
            return Err(ModelError::InvalidOptions(format!(
                "cannot order by '{}': not a field of {}",
                field, meta.name
            )));
        }
    }

    let where_clause = options.where_clause.clone().unwrap_or_else(WhereQuery::all);
    check_where_fields(&meta, &where_clause)?;

    let mut result = OperationResult::new(operation.with_where(where_clause.clone()));
    let resolved = ReadOptions {
        where_clause: Some(where_clause),
        order_by: options.order_by.clone(),
        limit: Some(limit),
        offset: options.offset,
    };
    backend.read(manager, model_name, &mut result, &resolved).await?;
    Ok(result)
}
