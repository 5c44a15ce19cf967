//! Data layer for the book catalog analyzer.
//!
//! Loads and normalizes the catalog CSV, computes the catalog aggregations
//! and assembles them into reports for the presentation layer.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use catalog_core as core;
