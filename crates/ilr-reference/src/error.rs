//! Error types for reference data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading reference tables.
///
/// Lookups on a built [`ReferenceData`](crate::ReferenceData) never fail;
/// only ingestion does.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReferenceError {
    /// Reference file not found.
    #[error("Reference file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a reference file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON reference bundle.
    #[error("Failed to parse reference bundle {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read or parse a CSV file.
    #[error("Failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required CSV header missing.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: &'static str, path: PathBuf },

    /// Invalid value in CSV field.
    #[error("Invalid {field} value '{value}' in {file}")]
    InvalidValue {
        field: &'static str,
        value: String,
        file: PathBuf,
    },
}

/// Result type for reference loading operations.
pub type Result<T> = std::result::Result<T, ReferenceError>;
