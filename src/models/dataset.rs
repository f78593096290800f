//! Dataset model
//!
//! Coerces a sequence of loosely-shaped source records into a uniform table:
//! the column set is the union of all fields seen, and rows are padded with
//! nulls for fields they did not carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// One row as returned by the source API.
///
/// The field set may vary slightly between pages; values are JSON scalars
/// (string, number, boolean) or null.
pub type Record = serde_json::Map<String, Value>;

/// An ordered sequence of records coerced into a uniform tabular shape.
///
/// Invariant: every row has exactly one value per column. Column order is
/// first-seen order across the input records; row order is arrival order.
///
/// # Example
///
/// ```rust
/// use soda_ingest::models::{Dataset, Record};
///
/// let mut a = Record::new();
/// a.insert("year".to_string(), serde_json::json!("2021"));
/// let mut b = Record::new();
/// b.insert("state".to_string(), serde_json::json!("CO"));
///
/// let dataset = Dataset::from_records(vec![a, b]);
/// assert_eq!(dataset.row_count(), 2);
/// assert_eq!(dataset.column_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with no columns and no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from raw source records
    ///
    /// The column set is the union of all field names, in first-seen order.
    /// Fields missing from a record become nulls in that row.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in &records {
            for field in record.keys() {
                if seen.insert(field.clone()) {
                    columns.push(field.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| record.remove(column).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in arrival order, each aligned with [`Dataset::columns`]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Check if the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop all rows past `len`, keeping the first `len` in arrival order
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Null count per column, aligned with [`Dataset::columns`]
    pub fn null_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.columns.len()];
        for row in &self.rows {
            for (idx, value) in row.iter().enumerate() {
                if value.is_null() {
                    counts[idx] += 1;
                }
            }
        }
        counts
    }

    /// Values of a single column, by column index
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unions_columns_in_first_seen_order() {
        let records = vec![
            record(&[("year", json!("2021")), ("state", json!("CO"))]),
            record(&[("state", json!("NY")), ("value", json!(12.5))]),
        ];

        let dataset = Dataset::from_records(records);
        assert_eq!(dataset.columns(), &["year", "state", "value"]);
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn pads_missing_fields_with_nulls() {
        let records = vec![
            record(&[("a", json!(1))]),
            record(&[("b", json!("x"))]),
        ];

        let dataset = Dataset::from_records(records);
        assert_eq!(dataset.rows()[0], vec![json!(1), Value::Null]);
        assert_eq!(dataset.rows()[1], vec![Value::Null, json!("x")]);
        assert_eq!(dataset.null_counts(), vec![1, 1]);
    }

    #[test]
    fn truncate_keeps_leading_rows() {
        let records = (0..5).map(|i| record(&[("n", json!(i))])).collect();
        let mut dataset = Dataset::from_records(records);

        dataset.truncate(3);
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.rows()[2], vec![json!(2)]);
    }

    #[test]
    fn empty_record_list_yields_empty_dataset() {
        let dataset = Dataset::from_records(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.column_count(), 0);
    }
}
