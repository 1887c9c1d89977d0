//! The load → clean → save sequence run by the `process-data` binary.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::info;

use crate::combiner::clean_data;
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::Result;
use crate::loader::{load_data, CsvOptions};
use crate::logging::OperationTimer;
use crate::metrics::{MetricsCollector, Stage};
use crate::validation::InputValidator;

/// Input and output locations for one run
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    /// Messages CSV
    pub messages: PathBuf,
    /// Categories CSV
    pub categories: PathBuf,
    /// Destination SQLite file
    pub database: PathBuf,
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Rows read from the messages file
    pub messages_rows: usize,
    /// Rows read from the categories file
    pub categories_rows: usize,
    /// Rows produced by the join
    pub joined_rows: usize,
    /// Category columns appended
    pub category_columns: usize,
    /// Duplicate rows dropped
    pub duplicates_removed: usize,
    /// Rows inserted into the destination table
    pub rows_written: usize,
    /// Destination table
    pub table_name: String,
}

/// Run the whole job.
///
/// The database is opened only after both inputs have been loaded and cleaned,
/// so a bad input never leaves a file behind.
pub fn run(paths: &PipelinePaths, config: &AppConfig) -> Result<PipelineSummary> {
    config.validate()?;
    InputValidator::validate_input_file(&paths.messages)?;
    InputValidator::validate_input_file(&paths.categories)?;
    InputValidator::validate_database_path(&paths.database)?;

    let metrics = MetricsCollector;
    let options = CsvOptions {
        delimiter: config.delimiter()?,
    };

    info!(
        messages = %paths.messages.display(),
        categories = %paths.categories.display(),
        "Loading data"
    );
    let timer = OperationTimer::new("load_data");
    let loaded = load_data(&paths.messages, &paths.categories, &config.pipeline.id_column, options)?;
    metrics.record_stage(Stage::Load, timer.finish());
    metrics.record_rows_loaded("messages", loaded.messages_rows);
    metrics.record_rows_loaded("categories", loaded.categories_rows);
    let joined_rows = loaded.joined.height();

    info!("Cleaning data");
    let timer = OperationTimer::new("clean_data");
    let cleaned = clean_data(
        &loaded.joined,
        &config.pipeline.categories_column,
        config.category_separator()?,
    )?;
    metrics.record_stage(Stage::Clean, timer.finish());
    metrics.record_duplicates_removed(cleaned.duplicates_removed);

    info!(database = %paths.database.display(), "Saving data");
    let timer = OperationTimer::new("save_data");
    let rows_written = save_data(&cleaned.table, &paths.database, &config.pipeline.table_name)?;
    metrics.record_stage(Stage::Save, timer.finish());
    metrics.record_rows_written(rows_written);

    info!("Cleaned data saved to database");

    Ok(PipelineSummary {
        messages_rows: loaded.messages_rows,
        categories_rows: loaded.categories_rows,
        joined_rows,
        category_columns: cleaned.category_columns,
        duplicates_removed: cleaned.duplicates_removed,
        rows_written,
        table_name: config.pipeline.table_name.clone(),
    })
}

/// Write the final frame, replacing any previous table of the same name.
pub fn save_data(table: &DataFrame, database_path: &Path, table_name: &str) -> Result<usize> {
    let mut db = Database::open(database_path)?;
    db.replace_table(table_name, table)
}
