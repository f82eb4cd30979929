//! Observable events emitted by the model layer
//!
//! Every log line carries one of these as its `event` field so that log
//! consumers can filter on a stable name rather than on message text.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Model definitions loaded from disk
    ModelsLoaded,
    /// A model type was registered with the manager
    ModelRegistered,

    // Backends
    /// A backend was configured under a name
    BackendConfigured,
    /// The backend table was reset to its default entry
    BackendsReset,

    // Validation
    /// Validation pass begins
    ValidationBegin,
    /// Validation pass complete
    ValidationComplete,

    // Operations
    /// Operation pipeline begins
    OperationBegin,
    /// Operation rejected by validation
    OperationInvalid,
    /// Operation failed with a fatal error
    OperationFailed,
    /// Operation completed
    OperationComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ModelsLoaded => "MODELS_LOADED",
            Event::ModelRegistered => "MODEL_REGISTERED",

            Event::BackendConfigured => "BACKEND_CONFIGURED",
            Event::BackendsReset => "BACKENDS_RESET",

            Event::ValidationBegin => "VALIDATION_BEGIN",
            Event::ValidationComplete => "VALIDATION_COMPLETE",

            Event::OperationBegin => "OPERATION_BEGIN",
            Event::OperationInvalid => "OPERATION_INVALID",
            Event::OperationFailed => "OPERATION_FAILED",
            Event::OperationComplete => "OPERATION_COMPLETE",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::OperationInvalid | Event::OperationFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
