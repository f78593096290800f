//! Data model for the pipeline
//!
//! A [`Record`] is one row as returned by the source API; a [`Dataset`] is the
//! uniform tabular shape the pipeline validates and loads.

mod dataset;

pub use dataset::{Dataset, Record};
