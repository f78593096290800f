//! Validation outcome types

use serde::{Deserialize, Serialize};

/// Hard validation failure
///
/// Only these two conditions abort the pipeline; every other finding is a
/// warning carried in the report.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Dataset has fewer rows than the configured minimum
    #[error("Row count validation failed: {actual} rows (minimum required: {minimum})")]
    RowCountBelowMinimum { actual: usize, minimum: usize },

    /// Dataset has no columns at all
    #[error("Schema validation failed: dataset has no columns")]
    NoColumns,
}

/// Null statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullDensityRow {
    /// Column name
    pub column: String,
    /// Number of null values in the column
    pub null_count: usize,
    /// Null percentage of the column, rounded to 2 decimals
    pub null_percentage: f64,
}

/// Outcome of the validation gate
///
/// Produced once per pipeline run; immutable after creation. Warnings are
/// always populated regardless of pass/fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "validation reports should be checked before loading"]
pub struct ValidationReport {
    /// Overall gate result; false only on a hard failure
    pub passed: bool,
    /// The hard failure that tripped the gate, if any
    pub failure: Option<ValidationError>,
    /// Non-fatal findings, in check order
    pub warnings: Vec<String>,
    /// Per-column null statistics, sorted descending by null percentage
    pub null_density: Vec<NullDensityRow>,
}

impl ValidationReport {
    /// Report for a dataset that passed the hard checks
    pub fn passed(warnings: Vec<String>, null_density: Vec<NullDensityRow>) -> Self {
        Self {
            passed: true,
            failure: None,
            warnings,
            null_density,
        }
    }

    /// Report for a dataset that tripped a hard check
    pub fn failed(failure: ValidationError, warnings: Vec<String>) -> Self {
        Self {
            passed: false,
            failure: Some(failure),
            warnings,
            null_density: Vec::new(),
        }
    }
}
