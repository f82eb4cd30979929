//! Component lookup for form rendering layers

mod components;

pub use components::{field_component_name, ComponentCategory, ComponentRegistry, PASSTHROUGH};
