//! Integration tests for the validation gate

use serde_json::{Value, json};

use soda_ingest::models::{Dataset, Record};
use soda_ingest::validation::{DatasetValidator, ValidationError};

/// Build a dataset of `rows` survey rows where `data_value` is null in the
/// first `nulls` of them
fn survey_dataset(rows: usize, nulls: usize) -> Dataset {
    let records = (0..rows)
        .map(|i| {
            let mut record = Record::new();
            record.insert("year".to_string(), json!("2021"));
            record.insert("locationabbr".to_string(), json!("CO"));
            record.insert(
                "data_value".to_string(),
                if i < nulls { Value::Null } else { json!(i as f64) },
            );
            record
        })
        .collect();
    Dataset::from_records(records)
}

fn default_validator() -> DatasetValidator {
    DatasetValidator::new(100, 50.0, Vec::new())
}

#[test]
fn dataset_below_minimum_rows_fails_naming_the_shortfall() {
    let report = default_validator().validate(&survey_dataset(50, 0));

    assert!(!report.passed);
    let failure = report.failure.unwrap();
    assert_eq!(
        failure,
        ValidationError::RowCountBelowMinimum {
            actual: 50,
            minimum: 100,
        }
    );
    assert!(failure.to_string().contains("50 rows"));
    assert!(failure.to_string().contains("100"));
}

#[test]
fn zero_column_dataset_fails_hard() {
    let report = DatasetValidator::new(0, 50.0, Vec::new()).validate(&Dataset::new());

    assert!(!report.passed);
    assert_eq!(report.failure, Some(ValidationError::NoColumns));
}

#[test]
fn missing_expected_columns_listed_exactly_once_in_warning() {
    let validator = DatasetValidator::new(
        100,
        50.0,
        vec![
            "year".to_string(),
            "sample_size".to_string(),
            "question".to_string(),
        ],
    );

    let report = validator.validate(&survey_dataset(200, 0));

    assert!(report.passed);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0],
        "Missing expected columns: question, sample_size"
    );
}

#[test]
fn null_density_report_sorted_descending() {
    let report = default_validator().validate(&survey_dataset(200, 120));

    let percentages: Vec<f64> = report
        .null_density
        .iter()
        .map(|row| row.null_percentage)
        .collect();
    let mut sorted = percentages.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(percentages, sorted);
    assert_eq!(report.null_density[0].column, "data_value");
    assert_eq!(report.null_density[0].null_percentage, 60.0);
}

#[test]
fn null_counts_bounded_by_row_count() {
    let dataset = survey_dataset(150, 150);
    let report = default_validator().validate(&dataset);

    for row in &report.null_density {
        assert!(row.null_count <= dataset.row_count());
    }
}

#[test]
fn high_null_column_warns_but_gate_passes() {
    let report = default_validator().validate(&survey_dataset(500, 300));

    assert!(report.passed);
    assert!(report.failure.is_none());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("data_value"));
    assert!(report.warnings[0].contains("60.00%"));
}

#[test]
fn boundary_row_count_passes() {
    let report = default_validator().validate(&survey_dataset(100, 0));

    assert!(report.passed);
    assert!(report.warnings.is_empty());
}
