//! Model operations
//!
//! Every write follows the same pipeline: resolve metadata and backend,
//! validate, and only then hand the record to the backend. Reads skip
//! validation.

mod create;
mod operation;
mod options;
mod pipeline;
mod read;
mod remove;
mod result;
mod update;

pub use create::create;
pub use operation::{ModelOperation, OperationKind};
pub use options::{CreateOptions, ReadOptions, RemoveOptions, UpdateOptions};
pub use read::read;
pub use remove::remove;
pub use result::{OperationError, OperationMeta, OperationResult};
pub use update::update;
