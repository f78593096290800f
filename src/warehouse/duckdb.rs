//! DuckDB warehouse backend implementation
//!
//! Embedded analytical engine; namespaces map to DuckDB schemas. Supports both
//! file-based persistence and in-memory mode.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::schema::{SqlType, infer_column_types, quote_ident};
use super::{LoadError, TableIdentifier, WarehouseBackend, WarehouseResult};
use crate::models::Dataset;

/// DuckDB warehouse backend
pub struct DuckDbWarehouse {
    /// Path to the database file (None for in-memory)
    db_path: Option<PathBuf>,
    /// DuckDB connection (wrapped in Mutex for thread safety)
    connection: Mutex<duckdb::Connection>,
}

impl DuckDbWarehouse {
    /// Open or create a file-based warehouse
    pub fn new(db_path: impl AsRef<Path>) -> WarehouseResult<Self> {
        let path = db_path.as_ref().to_path_buf();
        let connection = duckdb::Connection::open(&path)
            .map_err(|e| LoadError::ConnectionFailed(format!("Failed to open DuckDB: {}", e)))?;

        Ok(Self {
            db_path: Some(path),
            connection: Mutex::new(connection),
        })
    }

    /// Create an in-memory warehouse
    ///
    /// Useful for testing where persistence is not needed.
    pub fn in_memory() -> WarehouseResult<Self> {
        let connection = duckdb::Connection::open_in_memory().map_err(|e| {
            LoadError::ConnectionFailed(format!("Failed to create in-memory DuckDB: {}", e))
        })?;

        Ok(Self {
            db_path: None,
            connection: Mutex::new(connection),
        })
    }

    /// Get the database file path (None for in-memory)
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> WarehouseResult<std::sync::MutexGuard<'_, duckdb::Connection>> {
        self.connection
            .lock()
            .map_err(|e| LoadError::ConnectionFailed(format!("Lock error: {}", e)))
    }
}

fn type_ddl(ty: SqlType) -> &'static str {
    match ty {
        SqlType::Boolean => "BOOLEAN",
        SqlType::BigInt => "BIGINT",
        SqlType::Double => "DOUBLE",
        SqlType::Text => "VARCHAR",
    }
}

fn bind_value(value: &Value, ty: SqlType) -> duckdb::types::Value {
    use duckdb::types::Value as DbValue;

    match value {
        Value::Null => DbValue::Null,
        Value::Bool(b) if ty == SqlType::Boolean => DbValue::Boolean(*b),
        Value::Number(n) if ty == SqlType::BigInt => {
            n.as_i64().map(DbValue::BigInt).unwrap_or(DbValue::Null)
        }
        Value::Number(n) if ty == SqlType::Double => {
            n.as_f64().map(DbValue::Double).unwrap_or(DbValue::Null)
        }
        Value::String(s) => DbValue::Text(s.clone()),
        other => DbValue::Text(other.to_string()),
    }
}

#[async_trait(?Send)]
impl WarehouseBackend for DuckDbWarehouse {
    async fn namespace_exists(&self, namespace: &str) -> WarehouseResult<bool> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = ?",
                duckdb::params![namespace],
                |row| row.get(0),
            )
            .map_err(|e| {
                LoadError::NamespaceFailed(format!("Existence check failed: {}", e))
            })?;

        Ok(count > 0)
    }

    async fn create_namespace(&self, namespace: &str, location: &str) -> WarehouseResult<()> {
        // Storage placement is fixed by the database file in an embedded engine.
        debug!(location, "Ignoring storage location for embedded engine");

        let conn = self.lock()?;
        conn.execute(
            &format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(namespace)),
            [],
        )
        .map_err(|e| LoadError::NamespaceFailed(format!("Schema creation failed: {}", e)))?;

        Ok(())
    }

    async fn replace_table(
        &self,
        table: &TableIdentifier,
        dataset: &Dataset,
    ) -> WarehouseResult<()> {
        let mut conn = self.lock()?;

        let types = infer_column_types(dataset);
        let qualified = format!(
            "{}.{}",
            quote_ident(&table.namespace),
            quote_ident(&table.name)
        );
        let column_ddl = dataset
            .columns()
            .iter()
            .zip(&types)
            .map(|(column, ty)| format!("{} {}", quote_ident(column), type_ddl(*ty)))
            .collect::<Vec<_>>()
            .join(", ");
        let column_list = dataset
            .columns()
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; dataset.column_count()].join(", ");

        let tx = conn
            .transaction()
            .map_err(|e| LoadError::WriteFailed(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(&format!("DROP TABLE IF EXISTS {}", qualified), [])
            .map_err(|e| LoadError::WriteFailed(format!("Drop failed: {}", e)))?;

        tx.execute(&format!("CREATE TABLE {} ({})", qualified, column_ddl), [])
            .map_err(|e| LoadError::WriteFailed(format!("Create failed: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    qualified, column_list, placeholders
                ))
                .map_err(|e| LoadError::WriteFailed(format!("Prepare failed: {}", e)))?;

            for row in dataset.rows() {
                let params = row.iter().zip(&types).map(|(value, ty)| bind_value(value, *ty));
                stmt.execute(duckdb::params_from_iter(params))
                    .map_err(|e| LoadError::WriteFailed(format!("Insert failed: {}", e)))?;
            }
        }

        tx.commit()
            .map_err(|e| LoadError::WriteFailed(format!("Commit failed: {}", e)))?;

        Ok(())
    }

    async fn table_row_count(&self, table: &TableIdentifier) -> WarehouseResult<u64> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row(
                &format!(
                    "SELECT COUNT(*) FROM {}.{}",
                    quote_ident(&table.namespace),
                    quote_ident(&table.name)
                ),
                [],
                |row| row.get(0),
            )
            .map_err(|e| LoadError::ReadBackFailed(e.to_string()))?;

        Ok(count as u64)
    }
}
