//! Run command implementation
//!
//! Builds the configured source and warehouse backend, runs the full
//! extract-validate-load pipeline, and prints the run summary.

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::config::PipelineConfig;
use crate::extract::{RecordSource, SodaClient};
use crate::pipeline::{Pipeline, PipelineSummary};
use crate::warehouse::WarehouseBackend;

/// Run command arguments
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Workspace path containing the configuration file
    pub workspace: PathBuf,
    /// Override the configured page size
    pub page_size: Option<usize>,
    /// Override the configured record cap
    pub max_records: Option<usize>,
}

/// Handle the run command
pub fn handle_run(args: &RunArgs) -> Result<(), CliError> {
    let mut config = PipelineConfig::load(&args.workspace)?;

    if let Some(page_size) = args.page_size {
        config.source.page_size = page_size;
    }
    if let Some(max_records) = args.max_records {
        config.source.max_records = Some(max_records);
    }
    config.validate()?;

    let source = SodaClient::new(config.source.endpoint.clone())?
        .with_filters(config.source.filters.clone())
        .with_app_token(config.app_token());

    match config.destination.backend {
        #[cfg(feature = "duckdb-backend")]
        crate::config::WarehouseBackendType::DuckDB => {
            let backend =
                crate::warehouse::DuckDbWarehouse::new(config.duckdb_path(&args.workspace))?;
            execute(&config, &source, &backend)
        }
        #[cfg(feature = "postgres-backend")]
        crate::config::WarehouseBackendType::Postgres => {
            let connection_string = config
                .destination
                .connection_string
                .clone()
                .unwrap_or_default();
            let backend = crate::warehouse::PostgresWarehouse::connect(&connection_string)?;
            execute(&config, &source, &backend)
        }
        #[allow(unreachable_patterns)]
        other => Err(CliError::InvalidArgument(format!(
            "Warehouse backend '{}' is not enabled in this build",
            other
        ))),
    }
}

fn execute<S: RecordSource, B: WarehouseBackend>(
    config: &PipelineConfig,
    source: &S,
    backend: &B,
) -> Result<(), CliError> {
    let mut pipeline = Pipeline::new(config, source, backend);
    let summary = pipeline.run()?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &PipelineSummary) {
    println!("Pipeline completed successfully");
    println!("  rows loaded: {}", summary.row_count);
    println!("  destination: {}", summary.destination);
    if !summary.warnings.is_empty() {
        println!("  warnings:    {}", summary.warnings.len());
    }
    println!(
        "  duration:    {:.2}s",
        summary.duration_ms as f64 / 1000.0
    );
}
