//! CLI argument definitions using clap
//!
//! Commands:
//! - modelgate validate --models <dir> --model <name> --record <json>
//! - modelgate check --models <dir>
//! - modelgate components

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modelgate - validate model records against their definitions
#[derive(Parser, Debug)]
#[command(name = "modelgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "modelgate=debug"
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one record and print the validation result
    Validate {
        /// Directory of model definition files
        #[arg(long)]
        models: PathBuf,

        /// Model type name
        #[arg(long)]
        model: String,

        /// Record as a JSON object, or "-" to read it from stdin
        #[arg(long)]
        record: String,

        /// Operation to validate for: create, update or remove
        #[arg(long, default_value = "create")]
        operation: String,

        /// Validate only these fields
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Load model definitions and report what was found
    Check {
        /// Directory of model definition files
        #[arg(long)]
        models: PathBuf,
    },

    /// Print the UI component registry
    Components,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
