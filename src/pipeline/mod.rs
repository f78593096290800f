//! Pipeline driver
//!
//! Orchestrates Extract -> Validate -> Load as a strict state machine:
//! `Extracting -> Validating -> Loading -> Done`, with a terminal `Failed`
//! state reachable from any of the first three. Single attempt per stage,
//! fail-fast throughout; warnings never block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::extract::{Extractor, RecordSource, TransportError};
use crate::models::Dataset;
use crate::validation::{DatasetValidator, ValidationError};
use crate::warehouse::{LoadError, Loader, TableIdentifier, WarehouseBackend};

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Extracting,
    Validating,
    Loading,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Extracting => write!(f, "extracting"),
            PipelineStage::Validating => write!(f, "validating"),
            PipelineStage::Loading => write!(f, "loading"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

/// Fatal pipeline error, by originating stage
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source transport failure during extraction
    #[error("Extraction failed: {0}")]
    Extract(#[from] TransportError),

    /// Extraction completed but returned no rows
    #[error("No data fetched from source")]
    NoData,

    /// Hard validation failure
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Warehouse failure during load
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),
}

/// Summary emitted on a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// Destination identifier (`namespace.table`)
    pub destination: String,
    /// Row count read back from the destination after the load
    pub row_count: u64,
    /// Validation warnings surfaced during the run
    pub warnings: Vec<String>,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Elapsed wall-clock time in milliseconds
    pub duration_ms: u64,
}

/// Pipeline driver over a record source and a warehouse backend
pub struct Pipeline<'a, S: RecordSource, B: WarehouseBackend> {
    config: &'a PipelineConfig,
    source: &'a S,
    backend: &'a B,
    stage: PipelineStage,
}

impl<'a, S: RecordSource, B: WarehouseBackend> Pipeline<'a, S, B> {
    /// Create a driver; no work happens until [`Pipeline::run`]
    pub fn new(config: &'a PipelineConfig, source: &'a S, backend: &'a B) -> Self {
        Self {
            config,
            source,
            backend,
            stage: PipelineStage::Extracting,
        }
    }

    /// Current stage of the state machine
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Run the pipeline to completion
    ///
    /// Every fatal condition is returned as a [`PipelineError`] with the
    /// stage left at `Failed`; nothing is retried.
    pub fn run(&mut self) -> Result<PipelineSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(%run_id, "Pipeline started");

        self.stage = PipelineStage::Extracting;
        let dataset = match self.extract() {
            Ok(dataset) => dataset,
            Err(e) => return Err(self.fail(e)),
        };
        if dataset.is_empty() {
            return Err(self.fail(PipelineError::NoData));
        }
        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Extraction complete"
        );

        self.stage = PipelineStage::Validating;
        let report = DatasetValidator::new(
            self.config.validation.min_row_count,
            self.config.validation.max_null_percentage,
            self.config.validation.expected_columns.clone(),
        )
        .validate(&dataset);
        if let Some(failure) = report.failure {
            return Err(self.fail(failure.into()));
        }
        info!(warnings = report.warnings.len(), "Validation passed");

        self.stage = PipelineStage::Loading;
        let destination = TableIdentifier::new(
            &self.config.destination.namespace,
            &self.config.destination.table,
        );
        let loaded = match Loader::new(self.backend, &self.config.destination.location)
            .load(&dataset, &destination)
        {
            Ok(loaded) => loaded,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.stage = PipelineStage::Done;
        let summary = PipelineSummary {
            run_id,
            destination: loaded.destination.to_string(),
            row_count: loaded.row_count,
            warnings: report.warnings,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            rows = summary.row_count,
            destination = %summary.destination,
            duration_ms = summary.duration_ms,
            "Pipeline completed successfully"
        );

        Ok(summary)
    }

    fn extract(&self) -> Result<Dataset, PipelineError> {
        let dataset = Extractor::new(self.source, self.config.source.page_size)
            .with_max_records(self.config.source.max_records)
            .extract()?;
        Ok(dataset)
    }

    fn fail(&mut self, error: PipelineError) -> PipelineError {
        let stage = self.stage;
        self.stage = PipelineStage::Failed;
        error!(stage = %stage, "Pipeline failed: {}", error);
        error
    }
}
