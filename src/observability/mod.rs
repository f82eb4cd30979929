//! Observability for the model layer
//!
//! Structured JSON logs through `tracing`. Every event carries an `event`
//! field naming an [`Event`], followed by context fields such as `model`,
//! `operation` and `operation_id`.
//!
//! # Usage
//!
//! ```ignore
//! use modelgate::observability::{init_logging, Event};
//!
//! init_logging("info")?;
//! tracing::info!(event = %Event::ModelsLoaded, count = 3);
//! ```

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

use crate::error::{ModelError, ModelResult};

/// Install a JSON log subscriber filtered by `filter` (e.g. `"info"`,
/// `"modelgate=debug"`).
///
/// `RUST_LOG` takes precedence when set. Installing twice is an error.
pub fn init_logging(filter: &str) -> ModelResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| ModelError::Config(format!("invalid log filter '{}': {}", filter, e)))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ModelError::Config(format!("failed to install logger: {}", e)))
}
