//! CLI module for modelgate
//!
//! Provides command-line interface for:
//! - validate: validate one record against model definitions
//! - check: load model definitions and summarize them
//! - components: print the UI component registry

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, load_config, run, run_command, validate, ModelSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_arg, read_stdin, write_json};
