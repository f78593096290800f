//! Validation gate for assembled datasets
//!
//! Runs a fixed sequence of checks before anything is loaded:
//! - Row count (hard gate - the only check that aborts the pipeline)
//! - Schema (missing expected columns warn; a column-less dataset fails hard)
//! - Null density (per-column report, over-threshold columns warn)

mod dataset;
mod report;

pub use dataset::DatasetValidator;
pub use report::{NullDensityRow, ValidationError, ValidationReport};
