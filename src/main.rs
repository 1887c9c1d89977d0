use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

use disaster_response_etl::config::AppConfig;
use disaster_response_etl::logging::init_logging;
use disaster_response_etl::pipeline::{self, PipelinePaths};

const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. \n\nExample: process-data \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Messages CSV file
    messages: PathBuf,

    /// Categories CSV file
    categories: PathBuf,

    /// SQLite database file to write
    database: PathBuf,

    /// Extra configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[allow(clippy::print_stderr)]
fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            // Wrong argument count is not an error exit
            eprintln!("{err}");
            eprintln!("{USAGE}");
            return Ok(());
        }
    };

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Initialize logging
    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let _guard = init_logging(
        Some(&config.logging.level),
        config.logging.format == "json",
        log_file.as_deref(),
    )?;

    info!("Starting process-data");

    let paths = PipelinePaths {
        messages: cli.messages,
        categories: cli.categories,
        database: cli.database,
    };
    let summary = pipeline::run(&paths, &config).context("Pipeline failed")?;

    info!(
        table = %summary.table_name,
        messages = summary.messages_rows,
        categories = summary.categories_rows,
        joined = summary.joined_rows,
        category_columns = summary.category_columns,
        duplicates_removed = summary.duplicates_removed,
        rows_written = summary.rows_written,
        "Finished"
    );

    Ok(())
}
