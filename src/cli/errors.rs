//! CLI-specific error types

use std::fmt;
use std::io;

use crate::error::ModelError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Bad command line input
    UsageError,
    /// Model layer error
    ModelError,
    /// The record failed validation
    InvalidRecord,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "MODELGATE_CLI_CONFIG_ERROR",
            Self::IoError => "MODELGATE_CLI_IO_ERROR",
            Self::UsageError => "MODELGATE_CLI_USAGE_ERROR",
            Self::ModelError => "MODELGATE_CLI_MODEL_ERROR",
            Self::InvalidRecord => "MODELGATE_CLI_INVALID_RECORD",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Usage error
    pub fn usage_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::UsageError, msg)
    }

    /// Record failed validation
    pub fn invalid_record(error_count: usize) -> Self {
        Self::new(
            CliErrorCode::InvalidRecord,
            format!("record failed validation with {} error(s)", error_count),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Config(msg) => Self::config_error(msg),
            ModelError::Io(msg) => Self::io_error(msg),
            ModelError::InvalidOptions(msg) => Self::usage_error(msg),
            other => Self::new(CliErrorCode::ModelError, format!("[{}] {}", other.code(), other)),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
