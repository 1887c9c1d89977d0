//! Database schema definitions
//!
//! This module provides constants for the table and column names the job
//! reads and writes.

/// Output table schema
pub mod disaster_response {
    /// Table name
    pub const TABLE: &str = "disaster_response";
    /// Message identifier column, shared by both inputs
    pub const ID: &str = "id";
    /// Message text column
    pub const MESSAGE: &str = "message";
    /// Delimited categories column of the categories input; not written
    pub const CATEGORIES: &str = "categories";
    /// Separator between category tokens
    pub const CATEGORY_SEPARATOR: char = ';';
}
