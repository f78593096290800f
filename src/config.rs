//! Pipeline configuration file support
//!
//! Handles parsing of `.soda-ingest.toml` configuration files and
//! environment variable overrides. All thresholds and destination
//! identifiers are fixed at deployment through this file, never read from
//! ambient process state at run time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".soda-ingest.toml";

/// Default warehouse filename for DuckDB
pub const DEFAULT_DUCKDB_FILENAME: &str = ".soda-ingest.duckdb";

/// Default page size for extraction
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Default minimum row count accepted by the validation gate
pub const DEFAULT_MIN_ROW_COUNT: usize = 100;

/// Default maximum null percentage tolerated per column
pub const DEFAULT_MAX_NULL_PERCENTAGE: f64 = 50.0;

/// Environment variable for the source endpoint
pub const ENV_ENDPOINT: &str = "SODA_INGEST_ENDPOINT";

/// Environment variable for the application token
pub const ENV_APP_TOKEN: &str = "SODA_INGEST_APP_TOKEN";

/// Environment variable for the warehouse backend
pub const ENV_DB_BACKEND: &str = "SODA_INGEST_DB_BACKEND";

/// Environment variable for the DuckDB path
pub const ENV_DUCKDB_PATH: &str = "SODA_INGEST_DUCKDB_PATH";

/// Environment variable for the PostgreSQL connection string
pub const ENV_POSTGRES_URL: &str = "SODA_INGEST_POSTGRES_URL";

/// Error type for configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("IO error: {0}")]
    IoError(String),

    /// Config file is not valid TOML
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    SerializationError(String),

    /// Config is structurally valid but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Warehouse backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseBackendType {
    /// DuckDB embedded database (default)
    #[default]
    DuckDB,
    /// PostgreSQL database
    Postgres,
}

impl std::str::FromStr for WarehouseBackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckdb" => Ok(WarehouseBackendType::DuckDB),
            "postgres" | "postgresql" => Ok(WarehouseBackendType::Postgres),
            _ => Err(format!(
                "Unknown warehouse backend: {}. Use 'duckdb' or 'postgres'.",
                s
            )),
        }
    }
}

impl std::fmt::Display for WarehouseBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseBackendType::DuckDB => write!(f, "duckdb"),
            WarehouseBackendType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Source configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Dataset endpoint URL
    #[serde(default)]
    pub endpoint: String,

    /// Page size for paginated extraction
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Optional cap on total extracted records
    #[serde(default)]
    pub max_records: Option<usize>,

    /// Filter parameters merged into every page request
    #[serde(default)]
    pub filters: HashMap<String, String>,

    /// Name of the environment variable holding the application token
    #[serde(default)]
    pub app_token_env: Option<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            page_size: default_page_size(),
            max_records: None,
            filters: HashMap::new(),
            app_token_env: None,
        }
    }
}

/// Destination configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationSection {
    /// Warehouse backend type
    #[serde(default)]
    pub backend: WarehouseBackendType,

    /// Path to the DuckDB warehouse file (relative to the workspace)
    #[serde(default = "default_duckdb_path")]
    pub duckdb_path: String,

    /// PostgreSQL connection string
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Destination namespace (dataset/schema)
    #[serde(default)]
    pub namespace: String,

    /// Destination table name
    #[serde(default)]
    pub table: String,

    /// Storage location for namespace creation, on engines that support one
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_duckdb_path() -> String {
    DEFAULT_DUCKDB_FILENAME.to_string()
}

fn default_location() -> String {
    "US".to_string()
}

impl Default for DestinationSection {
    fn default() -> Self {
        Self {
            backend: WarehouseBackendType::default(),
            duckdb_path: default_duckdb_path(),
            connection_string: None,
            namespace: String::new(),
            table: String::new(),
            location: default_location(),
        }
    }
}

/// Validation configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSection {
    /// Minimum row count; fewer rows fails the run
    #[serde(default = "default_min_row_count")]
    pub min_row_count: usize,

    /// Maximum null percentage tolerated per column before warning
    #[serde(default = "default_max_null_percentage")]
    pub max_null_percentage: f64,

    /// Columns the dataset is expected to carry
    #[serde(default)]
    pub expected_columns: Vec<String>,
}

fn default_min_row_count() -> usize {
    DEFAULT_MIN_ROW_COUNT
}

fn default_max_null_percentage() -> f64 {
    DEFAULT_MAX_NULL_PERCENTAGE
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            min_row_count: default_min_row_count(),
            max_null_percentage: default_max_null_percentage(),
            expected_columns: Vec::new(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.soda-ingest.toml` configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Source configuration
    #[serde(default)]
    pub source: SourceSection,

    /// Destination configuration
    #[serde(default)]
    pub destination: DestinationSection,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationSection,
}

impl PipelineConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a workspace directory
    ///
    /// Looks for `.soda-ingest.toml` in the workspace directory.
    /// Falls back to defaults if not found.
    pub fn load(workspace_path: &Path) -> Result<Self, ConfigError> {
        let config_path = workspace_path.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;

            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a workspace directory
    pub fn save(&self, workspace_path: &Path) -> Result<(), ConfigError> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            self.source.endpoint = endpoint;
        }

        if let Ok(backend) = std::env::var(ENV_DB_BACKEND)
            && let Ok(backend_type) = backend.parse()
        {
            self.destination.backend = backend_type;
        }

        if let Ok(path) = std::env::var(ENV_DUCKDB_PATH) {
            self.destination.duckdb_path = path;
        }

        if let Ok(url) = std::env::var(ENV_POSTGRES_URL) {
            self.destination.connection_string = Some(url);
        }
    }

    /// Check that the configuration is runnable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.endpoint.is_empty() {
            return Err(ConfigError::Invalid(
                "source.endpoint must be set".to_string(),
            ));
        }
        if self.source.page_size == 0 {
            return Err(ConfigError::Invalid(
                "source.page_size must be greater than zero".to_string(),
            ));
        }
        if self.destination.namespace.is_empty() || self.destination.table.is_empty() {
            return Err(ConfigError::Invalid(
                "destination.namespace and destination.table must be set".to_string(),
            ));
        }
        if self.destination.backend == WarehouseBackendType::Postgres
            && self.destination.connection_string.is_none()
        {
            return Err(ConfigError::Invalid(
                "destination.connection_string is required for the postgres backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the application token, if a reference is configured
    ///
    /// `SODA_INGEST_APP_TOKEN` wins over the variable named in
    /// `source.app_token_env`.
    pub fn app_token(&self) -> Option<String> {
        if let Ok(token) = std::env::var(ENV_APP_TOKEN) {
            return Some(token);
        }
        self.source
            .app_token_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    }

    /// Get the DuckDB warehouse path for a workspace
    pub fn duckdb_path(&self, workspace_path: &Path) -> PathBuf {
        if self.destination.duckdb_path.is_empty() {
            workspace_path.join(DEFAULT_DUCKDB_FILENAME)
        } else if Path::new(&self.destination.duckdb_path).is_absolute() {
            PathBuf::from(&self.destination.duckdb_path)
        } else {
            workspace_path.join(&self.destination.duckdb_path)
        }
    }

    /// Check if configuration exists in a workspace
    pub fn exists(workspace_path: &Path) -> bool {
        workspace_path.join(CONFIG_FILENAME).exists()
    }
}
