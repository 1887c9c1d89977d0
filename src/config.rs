use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};
use crate::schema::disaster_response;
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Column names and destination table
    pub pipeline: PipelineConfig,
    /// CSV parsing
    pub input: InputConfig,
    /// Log level, format and file
    pub logging: LoggingConfig,
}

/// Names used by the join, the category expansion and the write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Join key present in both inputs
    pub id_column: String,
    /// Column holding the delimited category labels
    pub categories_column: String,
    /// Single-character separator between category tokens
    pub category_separator: String,
    /// Destination table, replaced on every run
    pub table_name: String,
}

/// CSV parsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Single-byte field delimiter
    pub delimiter: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Optional JSON log file
    pub file_path: Option<String>,
    /// Console format
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig {
                id_column: disaster_response::ID.to_string(),
                categories_column: disaster_response::CATEGORIES.to_string(),
                category_separator: disaster_response::CATEGORY_SEPARATOR.to_string(),
                table_name: disaster_response::TABLE.to_string(),
            },
            input: InputConfig {
                delimiter: ",".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default` and `config/local` if present, then
    /// `extra_file`, then `DISASTER_ETL__SECTION__KEY` environment variables.
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let app_config: Self = builder
            .add_source(Environment::with_prefix("DISASTER_ETL").prefix_separator("__").separator("__"))
            .build()?
            .try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate pipeline config
        if self.pipeline.id_column.trim().is_empty() {
            return Err(EtlError::InvalidInput("id_column cannot be empty".into()));
        }
        if self.pipeline.categories_column.trim().is_empty() {
            return Err(EtlError::InvalidInput("categories_column cannot be empty".into()));
        }
        if self.pipeline.id_column == self.pipeline.categories_column {
            return Err(EtlError::InvalidInput(
                "id_column and categories_column must differ".into(),
            ));
        }
        self.category_separator()?;
        InputValidator::validate_table_name(&self.pipeline.table_name)?;

        // Validate input config
        self.delimiter()?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(EtlError::InvalidInput(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(EtlError::InvalidInput(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }

    /// The category separator as a single character
    pub fn category_separator(&self) -> Result<char> {
        let mut chars = self.pipeline.category_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(EtlError::InvalidInput(format!(
                "category_separator must be a single character, got '{}'",
                self.pipeline.category_separator
            ))),
        }
    }

    /// The CSV delimiter as a single byte
    pub fn delimiter(&self) -> Result<u8> {
        match self.input.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(EtlError::InvalidInput(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.input.delimiter
            ))),
        }
    }
}
