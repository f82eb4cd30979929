//! Backend assembled from closures
//!
//! Useful for adapters and tests. Only the handlers that were set count as
//! supported, so a partially built backend is rejected by
//! [`BackendRegistry::configure`](super::BackendRegistry::configure).

use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::backend::Backend;
use crate::error::{ModelError, ModelResult};
use crate::models::{Model, ModelManager};
use crate::operations::{
    CreateOptions, OperationKind, OperationResult, ReadOptions, RemoveOptions, UpdateOptions,
};

type Handler<O> = Arc<
    dyn for<'a> Fn(
            &'a ModelManager,
            &'a Model,
            &'a mut OperationResult,
            &'a O,
        ) -> BoxFuture<'a, ModelResult<()>>
        + Send
        + Sync,
>;

type ReadHandler = Arc<
    dyn for<'a> Fn(
            &'a ModelManager,
            &'a str,
            &'a mut OperationResult,
            &'a ReadOptions,
        ) -> BoxFuture<'a, ModelResult<()>>
        + Send
        + Sync,
>;

/// A backend whose operations are closures
#[derive(Default, Clone)]
pub struct DynamicBackend {
    create: Option<Handler<CreateOptions>>,
    update: Option<Handler<UpdateOptions>>,
    read: Option<ReadHandler>,
    remove: Option<Handler<RemoveOptions>>,
}

impl DynamicBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(
                &'a ModelManager,
                &'a Model,
                &'a mut OperationResult,
                &'a CreateOptions,
            ) -> BoxFuture<'a, ModelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.create = Some(Arc::new(f));
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(
                &'a ModelManager,
                &'a Model,
                &'a mut OperationResult,
                &'a UpdateOptions,
            ) -> BoxFuture<'a, ModelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.update = Some(Arc::new(f));
        self
    }

    pub fn on_read<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(
                &'a ModelManager,
                &'a str,
                &'a mut OperationResult,
                &'a ReadOptions,
            ) -> BoxFuture<'a, ModelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.read = Some(Arc::new(f));
        self
    }

    pub fn on_remove<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(
                &'a ModelManager,
                &'a Model,
                &'a mut OperationResult,
                &'a RemoveOptions,
            ) -> BoxFuture<'a, ModelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.remove = Some(Arc::new(f));
        self
    }
}

fn unsupported(kind: OperationKind) -> ModelError {
    ModelError::backend(format!("{}() is not implemented by this backend", kind))
}

impl Backend for DynamicBackend {
    fn create<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a CreateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        match &self.create {
            Some(f) => f(manager, model, result, options),
            None => Box::pin(async { Err(unsupported(OperationKind::Create)) }),
        }
    }

    fn update<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a UpdateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        match &self.update {
            Some(f) => f(manager, model, result, options),
            None => Box::pin(async { Err(unsupported(OperationKind::Update)) }),
        }
    }

    fn read<'a>(
        &'a self,
        manager: &'a ModelManager,
        model_name: &'a str,
        result: &'a mut OperationResult,
        options: &'a ReadOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        match &self.read {
            Some(f) => f(manager, model_name, result, options),
            None => Box::pin(async { Err(unsupported(OperationKind::Read)) }),
        }
    }

    fn remove<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a RemoveOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        match &self.remove {
            Some(f) => f(manager, model, result, options),
            None => Box::pin(async { Err(unsupported(OperationKind::Remove)) }),
        }
    }

    fn supports(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Create => self.create.is_some(),
            OperationKind::Update => self.update.is_some(),
            OperationKind::Read => self.read.is_some(),
            OperationKind::Remove => self.remove.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_only_set_handlers() {
        let backend = DynamicBackend::new()
            .on_create(|_, _, _, _| Box::pin(async { Ok(()) }))
            .on_read(|_, _, _, _| Box::pin(async { Ok(()) }));

        assert!(backend.supports(OperationKind::Create));
        assert!(backend.supports(OperationKind::Read));
        assert!(!backend.supports(OperationKind::Update));
        assert!(!backend.supports(OperationKind::Remove));
    }

    #[tokio::test]
    async fn test_missing_handler_errors() {
        let backend = DynamicBackend::new();
        let manager = ModelManager::new();
        let mut result = OperationResult::new(crate::operations::ModelOperation::new(OperationKind::Read));

        let err = backend
            .read(&manager, "Task", &mut result, &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Backend(_)));
    }

    #[tokio::test]
    async fn test_handler_writes_result() {
        let backend = DynamicBackend::new().on_read(|_, _, result, _| {
            Box::pin(async move {
                result.meta.total_count = Some(0);
                result.results = Some(Vec::new());
                Ok(())
            })
        });
        let manager = ModelManager::new();
        let mut result = OperationResult::new(crate::operations::ModelOperation::new(OperationKind::Read));

        backend
            .read(&manager, "Task", &mut result, &ReadOptions::default())
            .await
            .unwrap();
        assert_eq!(result.meta.total_count, Some(0));
    }
}
