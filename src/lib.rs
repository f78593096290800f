//! soda-ingest - Extract-validate-load pipeline for Socrata-style open data portals
//!
//! Provides the three pipeline components and a driver that runs them in sequence:
//! - Paginated extraction from a `$limit`/`$offset` HTTP source
//! - A quality gate (row count, schema, null density) over the assembled dataset
//! - A full-replace load into an analytical warehouse table
//!
//! The warehouse side is abstracted behind [`warehouse::WarehouseBackend`] with
//! feature-gated DuckDB and PostgreSQL implementations.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod validation;
pub mod warehouse;

// Re-export commonly used types
pub use config::{PipelineConfig, WarehouseBackendType};
#[cfg(feature = "http-source")]
pub use extract::SodaClient;
pub use extract::{Extractor, RecordSource, TransportError};
pub use models::{Dataset, Record};
pub use pipeline::{Pipeline, PipelineError, PipelineStage, PipelineSummary};
pub use validation::{DatasetValidator, NullDensityRow, ValidationError, ValidationReport};
#[cfg(feature = "duckdb-backend")]
pub use warehouse::DuckDbWarehouse;
#[cfg(feature = "postgres-backend")]
pub use warehouse::PostgresWarehouse;
pub use warehouse::{LoadError, LoadResult, Loader, TableIdentifier, WarehouseBackend};
