//! Steps shared by the operation pipelines

use std::future::Future;

use uuid::Uuid;

use super::operation::OperationKind;
use super::result::OperationResult;
use crate::error::{ModelError, ModelResult};
use crate::models::{Model, ModelMeta};
use crate::observability::Event;
use crate::query::WhereQuery;
use crate::validation::ValidationOptions;

/// Run one pipeline and log its begin and outcome
pub(super) async fn observed<F>(
    model: &str,
    kind: OperationKind,
    id: Uuid,
    pipeline: F,
) -> ModelResult<OperationResult>
where
    F: Future<Output = ModelResult<OperationResult>>,
{
    tracing::debug!(
        event = %Event::OperationBegin,
        model = %model,
        operation = %kind,
        operation_id = %id,
    );

    let outcome = pipeline.await;

    match &outcome {
        Ok(result) => tracing::info!(
            event = %Event::OperationComplete,
            model = %model,
            operation = %kind,
            operation_id = %id,
            total_count = result.meta.total_count,
        ),
        Err(ModelError::Validation(result)) => tracing::info!(
            event = %Event::OperationInvalid,
            model = %model,
            operation = %kind,
            operation_id = %id,
            errors = result.validation.as_ref().map_or(0, |v| v.error_count()),
        ),
        Err(e) => tracing::warn!(
            event = %Event::OperationFailed,
            model = %model,
            operation = %kind,
            operation_id = %id,
            code = e.code(),
            error = %e,
        ),
    }

    outcome
}

/// Caller validation options over the configured timeout
pub(super) fn validation_options(
    given: Option<&ValidationOptions>,
    default_timeout_ms: u64,
) -> ValidationOptions {
    let defaults = ValidationOptions::default().with_timeout_ms(default_timeout_ms);
    given.cloned().unwrap_or_default().merged_over(&defaults)
}

/// The caller's where clause, or equality on the model's primary key
pub(super) fn resolve_where(
    meta: &ModelMeta,
    model: &Model,
    given: Option<&WhereQuery>,
    kind: OperationKind,
) -> ModelResult<WhereQuery> {
    let query = match given {
        Some(query) => query.clone(),
        None => {
            let pk = meta
                .primary_key
                .as_deref()
                .ok_or(ModelError::MissingWhereClause(kind))?;
            let value = model
                .get_set(pk)
                .ok_or(ModelError::MissingWhereClause(kind))?;
            WhereQuery::eq(pk, value.clone())
        }
    };
    check_where_fields(meta, &query)?;
    Ok(query)
}

/// Every field named by the clause must be declared on the model
pub(super) fn check_where_fields(meta: &ModelMeta, query: &WhereQuery) -> ModelResult<()> {
    match query.field_names().into_iter().find(|f| meta.field(f).is_none()) {
        Some(unknown) => Err(ModelError::InvalidQuery(format!(
            "'{}' is not a field of {}",
            unknown, meta.name
        ))),
        None => Ok(()),
    }
}
