//! CLI command implementations

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::ModelsConfig;
use crate::models::{Model, ModelManager};
use crate::observability::{self, Event};
use crate::operations::{ModelOperation, OperationKind};
use crate::ui::ComponentRegistry;
use crate::validation::{self, ValidationOptions, ValidationResult};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_json_arg, write_json};

/// Summary printed by `check`
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub backend: String,
    pub fields: usize,
}

/// Parse arguments, install logging and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = load_config(cli.config.as_deref())?;

    let filter = cli.log.as_deref().unwrap_or(&config.log_filter);
    observability::init_logging(filter)?;
    tracing::debug!(event = %Event::ConfigLoaded, read_limit = config.read_limit);

    run_command(cli.command, config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: ModelsConfig) -> CliResult<()> {
    match cmd {
        Command::Validate {
            models,
            model,
            record,
            operation,
            fields,
        } => {
            let record = read_json_arg(&record)?;
            let result = validate(config, &models, &model, record, &operation, fields)?;
            write_json(&result)?;
            if result.valid() {
                Ok(())
            } else {
                Err(CliError::invalid_record(result.error_count()))
            }
        }
        Command::Check { models } => write_json(&check(config, &models)?),
        Command::Components => write_json(&ComponentRegistry::new()),
    }
}

/// Configuration from `path`, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> CliResult<ModelsConfig> {
    match path {
        Some(path) => Ok(ModelsConfig::load(path)?),
        None => Ok(ModelsConfig::default()),
    }
}

/// Validate one record against the definitions in `models_dir`
pub fn validate(
    config: ModelsConfig,
    models_dir: &Path,
    model_name: &str,
    record: Value,
    operation: &str,
    fields: Vec<String>,
) -> CliResult<ValidationResult> {
    let kind: OperationKind = operation.parse()?;
    if !kind.validates() {
        return Err(CliError::usage_error(format!(
            "{}() does not validate records",
            kind
        )));
    }

    let values = match record {
        Value::Object(values) => values,
        other => {
            return Err(CliError::usage_error(format!(
                "record must be a JSON object, got {}",
                other
            )))
        }
    };

    let manager = ModelManager::with_config(config);
    manager.load_dir(models_dir)?;

    let model = Model::from_values(model_name, values);
    let operation = ModelOperation::new(kind);
    let options = ValidationOptions {
        fields: (!fields.is_empty()).then_some(fields),
        timeout_ms: None,
    };

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to start runtime: {}", e)))?;
    let result = runtime.block_on(validation::validate(&manager, &model, &operation, &options))?;
    Ok(result)
}

/// Load the definitions in `models_dir` and summarize them
pub fn check(config: ModelsConfig, models_dir: &Path) -> CliResult<Vec<ModelSummary>> {
    let manager = ModelManager::with_config(config);
    manager.load_dir(models_dir)?;

    manager
        .model_names()
        .into_iter()
        .map(|name| {
            let meta = manager.get_model_meta(&name)?;
            Ok(ModelSummary {
                backend: meta
                    .backend
                    .clone()
                    .unwrap_or_else(|| manager.config().default_backend.clone()),
                fields: meta.fields.len(),
                name,
            })
        })
        .collect()
}
