//! Schema inference for replace-loads
//!
//! The destination schema is auto-detected from the dataset's values rather
//! than pre-declared, so every run is self-contained.

use serde_json::Value;

use crate::models::Dataset;

/// SQL column type inferred from observed values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    BigInt,
    Double,
    Text,
}

/// Infer one SQL type per dataset column
///
/// Widening rules over the non-null values of a column: all booleans map to
/// BOOLEAN; all integers to BIGINT; any fractional number widens to DOUBLE;
/// anything mixed or textual falls back to TEXT, as does an all-null column.
pub fn infer_column_types(dataset: &Dataset) -> Vec<SqlType> {
    (0..dataset.column_count())
        .map(|idx| infer_type(dataset.column_values(idx)))
        .collect()
}

fn infer_type<'a>(values: impl Iterator<Item = &'a Value>) -> SqlType {
    let mut saw_value = false;
    let mut all_bool = true;
    let mut all_number = true;
    let mut integers_only = true;

    for value in values {
        match value {
            Value::Null => {}
            Value::Bool(_) => {
                saw_value = true;
                all_number = false;
            }
            Value::Number(n) => {
                saw_value = true;
                all_bool = false;
                if !n.is_i64() && !n.is_u64() {
                    integers_only = false;
                }
            }
            _ => {
                saw_value = true;
                all_bool = false;
                all_number = false;
            }
        }
    }

    if !saw_value {
        SqlType::Text
    } else if all_bool {
        SqlType::Boolean
    } else if all_number && integers_only {
        SqlType::BigInt
    } else if all_number {
        SqlType::Double
    } else {
        SqlType::Text
    }
}

/// Quote an identifier for use in DDL/DML statements
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
