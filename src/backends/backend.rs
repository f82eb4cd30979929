//! Backend contract

use futures_util::future::BoxFuture;

use crate::error::ModelResult;
use crate::models::{Model, ModelManager};
use crate::operations::{
    CreateOptions, OperationKind, OperationResult, ReadOptions, RemoveOptions, UpdateOptions,
};

/// Storage for model records
///
/// Backends receive options already resolved by the pipeline: `update`,
/// `remove` and `read` always get a where clause, `read` always gets a
/// limit. They report through the passed `OperationResult`.
pub trait Backend: Send + Sync {
    fn create<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a CreateOptions,
    ) -> BoxFuture<'a, ModelResult<()>>;

    fn update<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a UpdateOptions,
    ) -> BoxFuture<'a, ModelResult<()>>;

    fn read<'a>(
        &'a self,
        manager: &'a ModelManager,
        model_name: &'a str,
        result: &'a mut OperationResult,
        options: &'a ReadOptions,
    ) -> BoxFuture<'a, ModelResult<()>>;

    fn remove<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a RemoveOptions,
    ) -> BoxFuture<'a, ModelResult<()>>;

    /// Whether the backend implements `kind`. Checked when the backend is
    /// configured.
    fn supports(&self, _kind: OperationKind) -> bool {
        true
    }
}
