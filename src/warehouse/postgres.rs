//! PostgreSQL warehouse backend implementation
//!
//! Server engine for shared deployments; namespaces map to PostgreSQL schemas.

use async_trait::async_trait;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tracing::debug;

use super::schema::{SqlType, infer_column_types, quote_ident};
use super::{LoadError, TableIdentifier, WarehouseBackend, WarehouseResult};
use crate::models::Dataset;

/// PostgreSQL warehouse backend
///
/// Owns a runtime that drives the connection task; trait calls may be awaited
/// from any runtime.
pub struct PostgresWarehouse {
    /// Connection string
    connection_string: String,
    /// Runtime that keeps the background connection task alive
    _runtime: tokio::runtime::Runtime,
    /// PostgreSQL client (wrapped for async access)
    client: Arc<Mutex<tokio_postgres::Client>>,
}

impl PostgresWarehouse {
    /// Connect to a PostgreSQL warehouse
    pub fn connect(connection_string: &str) -> WarehouseResult<Self> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| LoadError::Runtime(format!("Failed to create runtime: {}", e)))?;

        let (client, connection) = runtime
            .block_on(tokio_postgres::connect(
                connection_string,
                tokio_postgres::NoTls,
            ))
            .map_err(|e| {
                LoadError::ConnectionFailed(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        // Drive the connection until the backend is dropped
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            connection_string: connection_string.to_string(),
            _runtime: runtime,
            client: Arc::new(Mutex::new(client)),
        })
    }

    /// Get the connection string (masked for security)
    pub fn connection_string_masked(&self) -> String {
        if let Some(at_pos) = self.connection_string.find('@')
            && let Some(colon_pos) = self.connection_string[..at_pos].rfind(':')
        {
            let prefix = &self.connection_string[..colon_pos + 1];
            let suffix = &self.connection_string[at_pos..];
            return format!("{}****{}", prefix, suffix);
        }
        self.connection_string.clone()
    }
}

fn type_ddl(ty: SqlType) -> &'static str {
    match ty {
        SqlType::Boolean => "BOOLEAN",
        SqlType::BigInt => "BIGINT",
        SqlType::Double => "DOUBLE PRECISION",
        SqlType::Text => "TEXT",
    }
}

fn bind_value(value: &Value, ty: SqlType) -> Box<dyn ToSql + Sync> {
    match ty {
        SqlType::Boolean => Box::new(value.as_bool()),
        SqlType::BigInt => Box::new(value.as_i64()),
        SqlType::Double => Box::new(value.as_f64()),
        SqlType::Text => Box::new(match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }),
    }
}

#[async_trait(?Send)]
impl WarehouseBackend for PostgresWarehouse {
    async fn namespace_exists(&self, namespace: &str) -> WarehouseResult<bool> {
        let client = self.client.lock().await;

        let row = client
            .query_opt(
                "SELECT schema_name FROM information_schema.schemata WHERE schema_name = $1",
                &[&namespace],
            )
            .await
            .map_err(|e| LoadError::NamespaceFailed(format!("Existence check failed: {}", e)))?;

        Ok(row.is_some())
    }

    async fn create_namespace(&self, namespace: &str, location: &str) -> WarehouseResult<()> {
        // PostgreSQL fixes placement at the database level.
        debug!(location, "Ignoring storage location for PostgreSQL");

        let client = self.client.lock().await;
        client
            .execute(
                &format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(namespace)),
                &[],
            )
            .await
            .map_err(|e| LoadError::NamespaceFailed(format!("Schema creation failed: {}", e)))?;

        Ok(())
    }

    async fn replace_table(
        &self,
        table: &TableIdentifier,
        dataset: &Dataset,
    ) -> WarehouseResult<()> {
        let mut client = self.client.lock().await;

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
        let placeholders = (1..=dataset.column_count())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = client
            .transaction()
            .await
            .map_err(|e| LoadError::WriteFailed(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(&format!("DROP TABLE IF EXISTS {}", qualified), &[])
            .await
            .map_err(|e| LoadError::WriteFailed(format!("Drop failed: {}", e)))?;

        tx.execute(&format!("CREATE TABLE {} ({})", qualified, column_ddl), &[])
            .await
            .map_err(|e| LoadError::WriteFailed(format!("Create failed: {}", e)))?;

        let insert = tx
            .prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                qualified, column_list, placeholders
            ))
            .await
            .map_err(|e| LoadError::WriteFailed(format!("Prepare failed: {}", e)))?;

        for row in dataset.rows() {
            let params: Vec<Box<dyn ToSql + Sync>> = row
                .iter()
                .zip(&types)
                .map(|(value, ty)| bind_value(value, *ty))
                .collect();
            let param_refs: Vec<&(dyn ToSql + Sync)> =
                params.iter().map(|p| p.as_ref()).collect();

            tx.execute(&insert, &param_refs)
                .await
                .map_err(|e| LoadError::WriteFailed(format!("Insert failed: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| LoadError::WriteFailed(format!("Commit failed: {}", e)))?;

        Ok(())
    }

    async fn table_row_count(&self, table: &TableIdentifier) -> WarehouseResult<u64> {
        let client = self.client.lock().await;

        let row = client
            .query_one(
                &format!(
                    "SELECT COUNT(*) FROM {}.{}",
                    quote_ident(&table.namespace),
                    quote_ident(&table.name)
                ),
                &[],
            )
            .await
            .map_err(|e| LoadError::ReadBackFailed(e.to_string()))?;

        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}
