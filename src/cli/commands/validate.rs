//! Validate command implementation
//!
//! Runs the quality gate standalone over a JSON record dump, without loading.

use std::io::Read;
use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::config::PipelineConfig;
use crate::models::{Dataset, Record};
use crate::validation::{DatasetValidator, ValidationReport};

/// Validate command arguments
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    /// Input file path or '-' for stdin
    pub input: String,
    /// Workspace path whose configuration supplies the thresholds
    pub workspace: PathBuf,
}

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Handle the validate command
pub fn handle_validate(args: &ValidateArgs) -> Result<(), CliError> {
    let content = load_input(&args.input)?;

    let records: Vec<Record> = serde_json::from_str(&content)
        .map_err(|e| CliError::InvalidArgument(format!("Input is not a JSON record list: {}", e)))?;
    let dataset = Dataset::from_records(records);

    let config = PipelineConfig::load(&args.workspace)?;
    let report = DatasetValidator::new(
        config.validation.min_row_count,
        config.validation.max_null_percentage,
        config.validation.expected_columns,
    )
    .validate(&dataset);

    print_report(&report);

    match report.failure {
        Some(failure) => Err(CliError::Validation(failure)),
        None => Ok(()),
    }
}

fn print_report(report: &ValidationReport) {
    if report.passed {
        println!("Validation passed");
    } else {
        println!("Validation failed");
    }

    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }

    if !report.null_density.is_empty() {
        println!("  null density:");
        for row in &report.null_density {
            println!(
                "    {:<24} {:>8} nulls  {:>6.2}%",
                row.column, row.null_count, row.null_percentage
            );
        }
    }
}
