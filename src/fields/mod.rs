//! Field definitions for model types
//!
//! Fields are data: a name, a kind and an options bag. The validation layer
//! turns them into rules at validation time.

mod field;
mod types;

pub use field::FieldDef;
pub use types::{FieldKind, FieldOptions, Pattern};
