//! Warehouse abstraction for the load stage
//!
//! This module provides the destination-side abstraction layer:
//! - DuckDB: embedded analytical database (file-based or in-memory)
//! - PostgreSQL: for server deployments
//!
//! Backends expose namespace provisioning, a full-replace table write, and a
//! row-count read-back; [`Loader`] sequences them into the idempotent load.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "duckdb-backend")]
pub mod duckdb;

#[cfg(feature = "postgres-backend")]
pub mod postgres;

mod loader;
mod schema;

#[cfg(feature = "duckdb-backend")]
pub use self::duckdb::DuckDbWarehouse;

#[cfg(feature = "postgres-backend")]
pub use self::postgres::PostgresWarehouse;

pub use loader::Loader;
pub use schema::{SqlType, infer_column_types, quote_ident};

use crate::models::Dataset;

/// Error type for warehouse operations
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to connect to the warehouse
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Namespace existence check or creation failed
    #[error("Namespace provisioning failed: {0}")]
    NamespaceFailed(String),

    /// Replace-write did not commit
    #[error("Table write failed: {0}")]
    WriteFailed(String),

    /// Post-write row count could not be read back
    #[error("Row count read-back failed: {0}")]
    ReadBackFailed(String),

    /// Blocking runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type for warehouse operations
pub type WarehouseResult<T> = Result<T, LoadError>;

/// Table identifier with namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableIdentifier {
    /// Namespace (dataset/schema) within the destination warehouse
    pub namespace: String,
    /// Table name
    pub name: String,
}

impl TableIdentifier {
    /// Create a new table identifier
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse from a dot-separated string (e.g. `analytics.raw_brfss`)
    pub fn parse(s: &str) -> WarehouseResult<Self> {
        let parts: Vec<&str> = s.splitn(2, '.').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(LoadError::NamespaceFailed(format!(
                "Invalid table identifier: {}. Expected format: namespace.table",
                s
            )));
        }
        Ok(Self::new(parts[0], parts[1]))
    }
}

impl std::fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Result of a successful load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResult {
    /// Destination table
    pub destination: TableIdentifier,
    /// Row count read back from the destination after the commit
    pub row_count: u64,
}

/// Warehouse backend trait for the load stage
///
/// Operations are async to share one interface between the embedded and the
/// server engines; [`Loader`] drives them to completion on a blocking runtime.
#[async_trait(?Send)]
pub trait WarehouseBackend {
    /// Check whether `namespace` exists in the destination
    async fn namespace_exists(&self, namespace: &str) -> WarehouseResult<bool>;

    /// Create `namespace`
    ///
    /// `location` is the storage placement for engines that support one;
    /// engines with a fixed placement ignore it.
    async fn create_namespace(&self, namespace: &str, location: &str) -> WarehouseResult<()>;

    /// Replace the destination table's contents with `dataset`
    ///
    /// Prior contents are discarded; the schema is inferred from the dataset's
    /// columns. The replace must be atomic: on failure the destination keeps
    /// its prior state.
    async fn replace_table(
        &self,
        table: &TableIdentifier,
        dataset: &Dataset,
    ) -> WarehouseResult<()>;

    /// Read back the destination table's committed row count
    async fn table_row_count(&self, table: &TableIdentifier) -> WarehouseResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_identifier() {
        let id = TableIdentifier::parse("analytics.raw_brfss").unwrap();
        assert_eq!(id.namespace, "analytics");
        assert_eq!(id.name, "raw_brfss");
        assert_eq!(id.to_string(), "analytics.raw_brfss");
    }

    #[test]
    fn rejects_identifier_without_namespace() {
        assert!(TableIdentifier::parse("raw_brfss").is_err());
        assert!(TableIdentifier::parse(".raw_brfss").is_err());
    }
}
