//! modelgate - a validating model layer over pluggable storage backends
//!
//! Model types are declared as data (fields with kinds and options), records
//! are validated against them, and writes reach a backend only when the
//! record is valid.
//!
//! - `fields`, `models`: definitions, instances and the model manager
//! - `validation`: built-in rules, custom validators, result aggregation
//! - `operations`: create, update, read and remove pipelines
//! - `backends`: backend trait, registry, in-memory and closure backends
//! - `query`: where clauses for update, read and remove
//! - `ui`: component lookup for form rendering layers

pub mod backends;
pub mod cli;
pub mod config;
pub mod error;
pub mod fields;
pub mod models;
pub mod observability;
pub mod operations;
pub mod query;
pub mod ui;
pub mod validation;

pub use backends::{Backend, BackendRegistry, DynamicBackend, InMemoryBackend};
pub use config::ModelsConfig;
pub use error::{ModelError, ModelResult};
pub use fields::{FieldDef, FieldKind};
pub use models::{Model, ModelLoader, ModelManager, ModelMeta};
pub use operations::{
    CreateOptions, ModelOperation, OperationKind, OperationResult, ReadOptions, RemoveOptions,
    UpdateOptions,
};
pub use query::WhereQuery;
pub use validation::{ValidationOptions, ValidationResult};
