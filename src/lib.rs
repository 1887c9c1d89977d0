//! Disaster Response ETL - Message and Category Loading
//!
//! A Rust library that merges disaster response messages with their category
//! labels and stores the result in a SQLite table.
//!
//! # Features
//!
//! - Load messages and categories from CSV files
//! - Inner-join both datasets on the message identifier
//! - Expand `related-1;request-0;...` strings into one numeric column per category
//! - Drop duplicate rows
//! - Replace the `disaster_response` table of a SQLite database

/// Category string expansion
pub mod categories;
/// Combining expanded categories with the merged dataset
pub mod combiner;
/// Configuration management
pub mod config;
/// Database operations
pub mod db;
/// Error types
pub mod error;
/// CSV loading and merging on top of polars
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Tables read back from the database
pub mod models;
/// End-to-end job
pub mod pipeline;
/// Database schema definitions
pub mod schema;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{EtlError, Result};
pub use models::StoredTable;
pub use pipeline::{run, PipelinePaths, PipelineSummary};
