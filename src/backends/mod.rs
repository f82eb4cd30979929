//! Storage backends
//!
//! A backend stores records for the model types that name it. Backends are
//! looked up by name in the [`BackendRegistry`] owned by the model manager.

mod backend;
mod dynamic;
mod inmemory;
mod registry;

pub use backend::Backend;
pub use dynamic::DynamicBackend;
pub use inmemory::InMemoryBackend;
pub use registry::BackendRegistry;
