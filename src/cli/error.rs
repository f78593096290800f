//! CLI-specific error types

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::extract::TransportError;
use crate::pipeline::PipelineError;
use crate::validation::ValidationError;
use crate::warehouse::LoadError;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Transport(#[from] TransportError),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] LoadError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    IoError(String),
}
