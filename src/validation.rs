use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EtlError, Result};

#[allow(clippy::expect_used)]
static TABLE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Validation utilities for command line inputs
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate an input CSV path: it must exist and be a regular file
    pub fn validate_input_file(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(EtlError::InvalidInput("Input path cannot be empty".into()));
        }

        if !path.exists() {
            return Err(EtlError::InvalidInput(format!(
                "Input file does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(EtlError::InvalidInput(format!(
                "Input path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate the destination database path
    ///
    /// The file itself may be missing, but it must not be a directory and its
    /// parent directory must exist.
    pub fn validate_database_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(EtlError::InvalidInput("Database path cannot be empty".into()));
        }

        if path.is_dir() {
            return Err(EtlError::InvalidInput(format!(
                "Database path is a directory: {}",
                path.display()
            )));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(EtlError::InvalidInput(format!(
                    "Database directory does not exist: {}",
                    parent.display()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Validate an output table name
    pub fn validate_table_name(name: &str) -> Result<()> {
        if name.len() > 128 {
            return Err(EtlError::InvalidInput("Table name too long (max 128 characters)".into()));
        }

        if !TABLE_NAME_PATTERN.is_match(name) {
            return Err(EtlError::InvalidInput(format!(
                "Invalid table name '{name}': use letters, digits and underscores"
            )));
        }

        if name.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(EtlError::InvalidInput(format!(
                "Table name '{name}' is reserved by SQLite"
            )));
        }

        Ok(())
    }
}
