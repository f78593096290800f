//! Init command implementation
//!
//! Writes a starter configuration file into the workspace.

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::config::{CONFIG_FILENAME, PipelineConfig};

/// Init command arguments
#[derive(Debug, Clone)]
pub struct InitArgs {
    /// Workspace path
    pub workspace: PathBuf,
    /// Overwrite an existing configuration file
    pub force: bool,
}

/// Starter configuration pointing at the CDC BRFSS dataset
fn template_config() -> PipelineConfig {
    let mut config = PipelineConfig::new();
    config.source.endpoint = "https://data.cdc.gov/resource/dttw-5yxu.json".to_string();
    config.destination.namespace = "analytics".to_string();
    config.destination.table = "raw_brfss".to_string();
    config.validation.expected_columns = [
        "year",
        "locationabbr",
        "locationdesc",
        "class",
        "topic",
        "question",
        "data_value",
        "sample_size",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    config
}

/// Handle the init command
pub fn handle_init(args: &InitArgs) -> Result<(), CliError> {
    if !args.workspace.exists() {
        return Err(CliError::FileNotFound(args.workspace.clone()));
    }

    if PipelineConfig::exists(&args.workspace) && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists. Use --force to overwrite.",
            args.workspace.join(CONFIG_FILENAME).display()
        )));
    }

    template_config().save(&args.workspace)?;

    println!("Created {}", args.workspace.join(CONFIG_FILENAME).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_runnable() {
        assert!(template_config().validate().is_ok());
    }
}
