//! Metrics emitted by the pipeline.
//!
//! Only the `metrics` facade is used; nothing is recorded unless the embedding
//! program installs a recorder.

use std::time::Duration;

use metrics::{counter, histogram};

/// Rows read from an input file, labelled by source
pub const ROWS_LOADED_TOTAL: &str = "etl_rows_loaded_total";
/// Rows inserted into the output table
pub const ROWS_WRITTEN_TOTAL: &str = "etl_rows_written_total";
/// Duplicate rows dropped while cleaning
pub const DUPLICATES_REMOVED_TOTAL: &str = "etl_duplicates_removed_total";
/// Wall time of each pipeline stage
pub const STAGE_DURATION_SECONDS: &str = "etl_stage_duration_seconds";

/// Pipeline stages, used as the `stage` label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and merging the CSV inputs
    Load,
    /// Expanding categories and deduplicating
    Clean,
    /// Writing the SQLite table
    Save,
}

impl Stage {
    /// Label value for this stage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Clean => "clean",
            Self::Save => "save",
        }
    }
}

/// Metrics collection for one pipeline run
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsCollector;

impl MetricsCollector {
    /// Record rows read from an input file
    pub fn record_rows_loaded(&self, source: &'static str, rows: usize) {
        counter!(ROWS_LOADED_TOTAL, "source" => source).increment(rows as u64);
    }

    /// Record rows written to the database
    pub fn record_rows_written(&self, rows: usize) {
        counter!(ROWS_WRITTEN_TOTAL).increment(rows as u64);
    }

    /// Record duplicates removed during cleaning
    pub fn record_duplicates_removed(&self, rows: usize) {
        counter!(DUPLICATES_REMOVED_TOTAL).increment(rows as u64);
    }

    /// Record how long a stage took
    pub fn record_stage(&self, stage: Stage, duration: Duration) {
        histogram!(STAGE_DURATION_SECONDS, "stage" => stage.as_str()).record(duration.as_secs_f64());
    }
}
