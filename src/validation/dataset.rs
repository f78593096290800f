//! Dataset validation checks

use std::cmp::Ordering;

use tracing::{info, warn};

use super::{NullDensityRow, ValidationError, ValidationReport};
use crate::models::Dataset;

/// Dataset validator
///
/// Thresholds and the expected column list are injected at construction;
/// nothing is read from ambient process state.
pub struct DatasetValidator {
    min_row_count: usize,
    max_null_percentage: f64,
    expected_columns: Vec<String>,
}

impl DatasetValidator {
    /// Create a validator with explicit policy values
    pub fn new(
        min_row_count: usize,
        max_null_percentage: f64,
        expected_columns: Vec<String>,
    ) -> Self {
        Self {
            min_row_count,
            max_null_percentage,
            expected_columns,
        }
    }

    /// Run all checks against `dataset`
    ///
    /// Checks run strictly in order: row count (hard, short-circuits), schema
    /// (soft, except a column-less dataset which fails hard), null density
    /// (soft). Warnings never block the pipeline.
    pub fn validate(&self, dataset: &Dataset) -> ValidationReport {
        info!(rows = dataset.row_count(), "Starting data validation");

        let row_count = dataset.row_count();
        if row_count < self.min_row_count {
            let failure = ValidationError::RowCountBelowMinimum {
                actual: row_count,
                minimum: self.min_row_count,
            };
            warn!("{}", failure);
            return ValidationReport::failed(failure, Vec::new());
        }
        info!(rows = row_count, "Row count validation passed");

        let mut warnings = Vec::new();

        if dataset.column_count() == 0 {
            let failure = ValidationError::NoColumns;
            warn!("{}", failure);
            return ValidationReport::failed(failure, warnings);
        }

        let missing = self.missing_expected_columns(dataset);
        if !missing.is_empty() {
            let warning = format!("Missing expected columns: {}", missing.join(", "));
            warn!("{}", warning);
            warnings.push(warning);
        }
        info!(
            columns = dataset.column_count(),
            "Schema validation passed"
        );

        let null_density = self.null_density_report(dataset);
        for row in &null_density {
            if row.null_percentage > self.max_null_percentage {
                let warning = format!(
                    "{}: {:.2}% nulls (limit: {}%)",
                    row.column, row.null_percentage, self.max_null_percentage
                );
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
        info!(
            columns = null_density.len(),
            warnings = warnings.len(),
            "Null density check complete"
        );

        ValidationReport::passed(warnings, null_density)
    }

    /// Expected columns absent from the dataset, sorted
    fn missing_expected_columns(&self, dataset: &Dataset) -> Vec<String> {
        let mut missing: Vec<String> = self
            .expected_columns
            .iter()
            .filter(|expected| !dataset.columns().contains(*expected))
            .cloned()
            .collect();
        missing.sort();
        missing
    }

    /// Per-column null statistics, sorted descending by null percentage
    fn null_density_report(&self, dataset: &Dataset) -> Vec<NullDensityRow> {
        let row_count = dataset.row_count();
        let mut report: Vec<NullDensityRow> = dataset
            .columns()
            .iter()
            .zip(dataset.null_counts())
            .map(|(column, null_count)| {
                let percentage = (null_count as f64 / row_count as f64) * 100.0;
                NullDensityRow {
                    column: column.clone(),
                    null_count,
                    null_percentage: (percentage * 100.0).round() / 100.0,
                }
            })
            .collect();

        report.sort_by(|a, b| {
            b.null_percentage
                .partial_cmp(&a.null_percentage)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.column.cmp(&b.column))
        });
        report
    }
}
