//! Error types for the disaster-response-etl library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the pipeline.

use thiserror::Error;

/// Errors that can occur while loading, cleaning or saving the datasets.
#[derive(Error, Debug)]
pub enum EtlError {
    /// DataFrame errors: CSV parsing, joins, reshaping
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A required column is absent from a dataset
    #[error("Column '{column}' not found in {dataset}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
        /// Which dataset was searched
        dataset: String,
    },

    /// The categories column holds numbers instead of delimited strings
    #[error("Column '{0}' does not contain text values")]
    NonTextColumn(String),

    /// No rows are available to derive category names from
    #[error("Cannot derive category names: '{0}' has no rows")]
    EmptyTable(String),

    /// A category token does not end in a digit
    #[error("Invalid value '{value}' for category '{category}' in row {row}")]
    InvalidCategoryValue {
        /// Derived category column name
        category: String,
        /// 0-based row index
        row: usize,
        /// Offending token
        value: String,
    },

    /// Positional concatenation of frames with different heights
    #[error("Cannot concatenate frames with {left} and {right} rows")]
    RowCountMismatch {
        /// Rows in the left frame
        left: usize,
        /// Rows in the right frame
        right: usize,
    },

    /// Invalid user input (paths, names, configuration values)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Result with `EtlError`
pub type Result<T> = std::result::Result<T, EtlError>;

impl EtlError {
    /// Build a [`EtlError::MissingColumn`] for the given dataset.
    pub fn missing_column(column: &str, dataset: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            dataset: dataset.to_string(),
        }
    }
}
