use std::path::PathBuf;
use thiserror::Error;

/// File name the loader expects the catalog to be exported under.
pub const DATASET_FILENAME: &str = "Dataset Books.csv";

/// All errors produced by the book analyzer.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The dataset file does not exist.
    #[error("Dataset file not found: {}. Ensure 'Dataset Books.csv' is present.", .path.display())]
    SourceNotFound { path: PathBuf },

    /// The dataset header lacks one or more required columns.
    ///
    /// `missing` is kept sorted so the message is stable.
    #[error("Missing required columns in dataset: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed part-way through the file.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the catalog crates.
pub type Result<T> = std::result::Result<T, CatalogError>;
