//! Warehouse loader
//!
//! Sequences the load stage: idempotent namespace ensure, full-replace write,
//! and a read-back of the committed row count as write confirmation.

use tracing::{info, warn};

use super::{LoadError, LoadResult, TableIdentifier, WarehouseBackend, WarehouseResult};
use crate::models::Dataset;

/// Loader over a warehouse backend
///
/// The pipeline is synchronous; the loader owns the bridge onto the async
/// backend by driving it to completion on its own runtime per load call.
pub struct Loader<'a, B: WarehouseBackend> {
    backend: &'a B,
    location: String,
}

impl<'a, B: WarehouseBackend> Loader<'a, B> {
    /// Create a loader writing namespaces at `location`
    pub fn new(backend: &'a B, location: impl Into<String>) -> Self {
        Self {
            backend,
            location: location.into(),
        }
    }

    /// Load `dataset` into `table`, replacing prior contents
    ///
    /// Either the destination reflects the new dataset in full, or the run
    /// fails and the destination is left in its prior state.
    pub fn load(&self, dataset: &Dataset, table: &TableIdentifier) -> WarehouseResult<LoadResult> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| LoadError::Runtime(format!("Failed to create runtime: {}", e)))?;

        rt.block_on(self.load_inner(dataset, table))
    }

    async fn load_inner(
        &self,
        dataset: &Dataset,
        table: &TableIdentifier,
    ) -> WarehouseResult<LoadResult> {
        // Idempotent namespace ensure: a failed existence probe is treated as
        // "absent" and creation is attempted anyway.
        let exists = match self.backend.namespace_exists(&table.namespace).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    namespace = %table.namespace,
                    "Namespace existence check failed ({}), attempting creation",
                    e
                );
                false
            }
        };

        if exists {
            info!(namespace = %table.namespace, "Namespace already exists");
        } else {
            self.backend
                .create_namespace(&table.namespace, &self.location)
                .await?;
            info!(namespace = %table.namespace, "Created namespace");
        }

        info!(
            rows = dataset.row_count(),
            destination = %table,
            "Loading dataset"
        );

        self.backend.replace_table(table, dataset).await?;

        let row_count = self.backend.table_row_count(table).await?;
        info!(rows = row_count, destination = %table, "Load committed");

        Ok(LoadResult {
            destination: table.clone(),
            row_count,
        })
    }
}
