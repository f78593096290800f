//! CLI support for the `soda-ingest` binary

pub mod commands;
pub mod error;

pub use error::CliError;
