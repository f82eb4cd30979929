//! Operation Pipeline Tests
//!
//! Tests for the create/update/read/remove pipelines:
//! - An invalid record never reaches the backend
//! - A failing async validator is fatal and never reaches the backend
//! - Valid records round-trip through the in-memory backend
//! - update/remove select by primary key when no where clause is given
//! - read applies the configured default limit and reports paging metadata
//! - Unknown models and unconfigured backends are fatal errors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use modelgate::backends::Backend;
use modelgate::config::ModelsConfig;
use modelgate::fields::FieldDef;
use modelgate::models::{Model, ModelManager, ModelMeta};
use modelgate::operations::{
    CreateOptions, OperationKind, OperationResult, ReadOptions, RemoveOptions, UpdateOptions,
};
use modelgate::query::WhereQuery;
use modelgate::validation::{AsyncFieldValidator, FieldContext, SharedValidationResult};
use modelgate::{ModelError, ModelResult};

// =============================================================================
// Test Utilities
// =============================================================================

/// Backend that only counts calls
#[derive(Default)]
struct CountingBackend {
    calls: AtomicUsize,
}

impl CountingBackend {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit<'a>(&'a self) -> BoxFuture<'a, ModelResult<()>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }
}

impl Backend for CountingBackend {
    fn create<'a>(
        &'a self,
        _manager: &'a ModelManager,
        _model: &'a Model,
        _result: &'a mut OperationResult,
        _options: &'a CreateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        self.hit()
    }

    fn update<'a>(
        &'a self,
        _manager: &'a ModelManager,
        _model: &'a Model,
        _result: &'a mut OperationResult,
        _options: &'a UpdateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        self.hit()
    }

    fn read<'a>(
        &'a self,
        _manager: &'a ModelManager,
        _model_name: &'a str,
        _result: &'a mut OperationResult,
        _options: &'a ReadOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        self.hit()
    }

    fn remove<'a>(
        &'a self,
        _manager: &'a ModelManager,
        _model: &'a Model,
        _result: &'a mut OperationResult,
        _options: &'a RemoveOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        self.hit()
    }
}

/// Async validator whose lookup always fails
struct LookupFails;

impl AsyncFieldValidator for LookupFails {
    fn validate<'a>(
        &'a self,
        ctx: FieldContext<'a>,
        _result: &'a SharedValidationResult,
    ) -> BoxFuture<'a, ModelResult<()>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            Err(ModelError::validator_failed(&ctx.field.name, "lookup unavailable"))
        })
    }
}

fn task_meta() -> ModelMeta {
    ModelMeta::new(
        "Task",
        vec![
            FieldDef::auto_number("id"),
            FieldDef::text("title").max_length(20),
            FieldDef::integer("priority").optional(),
        ],
    )
    .primary_key("id")
}

fn manager() -> ModelManager {
    let manager = ModelManager::new();
    manager.register(task_meta()).unwrap();
    manager
}

fn ids(result: &OperationResult) -> Vec<i64> {
    result
        .results
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|m| m.get("id").and_then(Value::as_i64))
        .collect()
}

// =============================================================================
// Validation Gate
// =============================================================================

/// An invalid create fails with a validation error and the backend is never called.
#[tokio::test]
async fn test_invalid_create_skips_backend() {
    let manager = ModelManager::new();
    manager.register(task_meta().backend("counting")).unwrap();
    let backend = Arc::new(CountingBackend::default());
    manager.backends().configure("counting", backend.clone()).unwrap();

    let model = Model::new("Task").with("priority", "high");
    let err = manager
        .create(&model, &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    let validation = err.validation().unwrap();
    assert!(validation.has_error("title", "required"));
    assert!(validation.has_error("priority", "not_an_integer"));
    let result = err.result().unwrap();
    assert!(!result.success);
    assert_eq!(result.errors[0].code.as_deref(), Some("validation_error"));
    assert_eq!(backend.calls(), 0);

    let model = Model::new("Task").with("title", "ok");
    manager.create(&model, &CreateOptions::default()).await.unwrap();
    assert_eq!(backend.calls(), 1);
}

/// An async validator error is fatal: no validation result, no backend call.
#[tokio::test]
async fn test_async_validator_error_is_fatal() {
    let meta = ModelMeta::new(
        "Task",
        vec![
            FieldDef::auto_number("id"),
            FieldDef::text("title").with_async_validator(LookupFails),
        ],
    )
    .primary_key("id")
    .backend("counting");
    let manager = ModelManager::new();
    manager.register(meta).unwrap();
    let backend = Arc::new(CountingBackend::default());
    manager.backends().configure("counting", backend.clone()).unwrap();

    let err = manager
        .create(&Model::new("Task").with("title", "ok"), &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(err.validation().is_none());
    assert_eq!(err.code(), "VALIDATOR_FAILED");
    assert!(matches!(err, ModelError::ValidatorFailed { ref field, .. } if field == "title"));
    assert_eq!(backend.calls(), 0);
}

/// An invalid update or remove never reaches the backend either.
#[tokio::test]
async fn test_invalid_update_and_remove_skip_backend() {
    let manager = ModelManager::new();
    manager.register(task_meta().backend("counting")).unwrap();
    let backend = Arc::new(CountingBackend::default());
    manager.backends().configure("counting", backend.clone()).unwrap();

    let model = Model::new("Task").with("id", 1).with("title", "x".repeat(30));
    assert!(manager
        .update(&model, &UpdateOptions::default())
        .await
        .unwrap_err()
        .is_validation());
    assert!(manager
        .remove(&model, &RemoveOptions::default())
        .await
        .unwrap_err()
        .is_validation());
    assert_eq!(backend.calls(), 0);

    manager
        .read("Task", &ReadOptions::default())
        .await
        .unwrap();
    assert_eq!(backend.calls(), 1);
}

// =============================================================================
// In-Memory Round Trip
// =============================================================================

#[tokio::test]
async fn test_crud_round_trip() {
    let manager = manager();

    for title in ["write docs", "fix bug", "ship"] {
        let created = manager
            .create(&Model::new("Task").with("title", title), &CreateOptions::default())
            .await
            .unwrap();
        assert!(created.success);
        assert!(created.result.as_ref().unwrap().is_set("id"));
    }

    let all = manager.read("Task", &ReadOptions::default().order_by("id")).await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3]);

    // Update by primary key
    let update = Model::new("Task").with("id", 2).with("title", "fix bugs");
    let updated = manager
        .update(&update, &UpdateOptions::default().with_fields(["title"]))
        .await
        .unwrap();
    assert_eq!(updated.meta.total_count, Some(1));

    let found = manager
        .read(
            "Task",
            &ReadOptions::default().with_where(WhereQuery::eq("title", "fix bugs")),
        )
        .await
        .unwrap();
    assert_eq!(ids(&found), vec![2]);

    // Remove by primary key
    let removed = manager
        .remove(
            &Model::new("Task").with("id", 1).with("title", "write docs"),
            &RemoveOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(removed.meta.total_count, Some(1));

    let rest = manager.read("Task", &ReadOptions::default().order_by("id")).await.unwrap();
    assert_eq!(ids(&rest), vec![2, 3]);
}

#[tokio::test]
async fn test_update_with_where_clause() {
    let manager = manager();
    for (title, priority) in [("a", 1), ("b", 1), ("c", 2)] {
        manager
            .create(
                &Model::new("Task").with("title", title).with("priority", priority),
                &CreateOptions::default(),
            )
            .await
            .unwrap();
    }

    let where_clause = WhereQuery::parse(&json!({"priority": 1})).unwrap();
    let result = manager
        .update(
            &Model::new("Task").with("priority", 5),
            &UpdateOptions::default()
                .with_where(where_clause)
                .with_fields(["priority"]),
        )
        .await
        .unwrap();
    assert_eq!(result.meta.total_count, Some(2));

    let high = manager
        .read(
            "Task",
            &ReadOptions::default().with_where(WhereQuery::parse(&json!({"priority": {"_gt": 4}})).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(high.meta.total_count, Some(2));
}

// =============================================================================
// Where Clause Resolution
// =============================================================================

#[tokio::test]
async fn test_update_without_primary_key_value() {
    let manager = manager();
    let err = manager
        .update(&Model::new("Task").with("title", "x"), &UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::MissingWhereClause(OperationKind::Update)));
}

#[tokio::test]
async fn test_where_on_undeclared_field() {
    let manager = manager();
    let options = ReadOptions::default().with_where(WhereQuery::eq("owner", "amy"));
    let err = manager.read("Task", &options).await.unwrap_err();

    assert_eq!(err.code(), "INVALID_QUERY");
}

// =============================================================================
// Read Paging
// =============================================================================

#[tokio::test]
async fn test_read_default_limit_and_paging() {
    let config = ModelsConfig {
        read_limit: 3,
        ..ModelsConfig::default()
    };
    let manager = ModelManager::with_config(config);
    manager.register(task_meta()).unwrap();
    for i in 0..7 {
        manager
            .create(
                &Model::new("Task").with("title", format!("task {}", i)),
                &CreateOptions::default(),
            )
            .await
            .unwrap();
    }

    let first = manager.read("Task", &ReadOptions::default().order_by("id")).await.unwrap();
    assert_eq!(ids(&first), vec![1, 2, 3]);
    assert_eq!(first.meta.total_count, Some(7));
    assert_eq!(first.meta.limit, Some(3));

    let last = manager
        .read("Task", &ReadOptions::default().order_by("id").offset(6))
        .await
        .unwrap();
    assert_eq!(ids(&last), vec![7]);
    assert_eq!(last.meta.offset, Some(6));

    let err = manager
        .read("Task", &ReadOptions::default().limit(0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_OPTIONS");
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_model_is_fatal() {
    let manager = manager();
    let err = manager
        .create(&Model::new("Comment").with("body", "hi"), &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, ModelError::UnknownModel(ref name) if name == "Comment"));

    let err = manager.read("Comment", &ReadOptions::default()).await.unwrap_err();
    assert!(matches!(err, ModelError::UnknownModel(_)));
}

#[tokio::test]
async fn test_unconfigured_backend_is_fatal() {
    let manager = ModelManager::new();
    manager.register(task_meta().backend("archive")).unwrap();

    let err = manager
        .create(&Model::new("Task").with("title", "x"), &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, ModelError::BackendNotConfigured(ref name) if name == "archive"));
}
