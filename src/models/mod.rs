//! Model types, instances and the model manager

mod loader;
mod manager;
mod meta;
mod model;

pub use loader::ModelLoader;
pub use manager::ModelManager;
pub use meta::ModelMeta;
pub use model::Model;
