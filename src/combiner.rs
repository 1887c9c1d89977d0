//! Replacing the delimited categories column with its expanded form.

use polars::prelude::*;
use tracing::info;

use crate::categories::expand_categories;
use crate::error::{EtlError, Result};

/// Result of [`clean_data`]
#[derive(Debug, Clone)]
pub struct CleanedData {
    /// Final frame, ready to persist
    pub table: DataFrame,
    /// Number of category columns appended
    pub category_columns: usize,
    /// Number of duplicate rows dropped
    pub duplicates_removed: usize,
}

/// Drop `column` from `joined`, append `expanded` by row position and remove
/// duplicate rows (first occurrence wins).
pub fn append_categories(joined: &DataFrame, expanded: &DataFrame, column: &str) -> Result<(DataFrame, usize)> {
    let remaining = joined
        .drop(column)
        .map_err(|_| EtlError::missing_column(column, "merged dataset"))?;
    if expanded.width() > 0 && remaining.height() != expanded.height() {
        return Err(EtlError::RowCountMismatch {
            left: remaining.height(),
            right: expanded.height(),
        });
    }

    let combined = remaining.hstack(expanded.get_columns())?;
    let deduplicated = combined.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = combined.height() - deduplicated.height();
    Ok((deduplicated, removed))
}

/// Expand the categories of the merged dataset and fold them back in.
pub fn clean_data(joined: &DataFrame, column: &str, separator: char) -> Result<CleanedData> {
    let expanded = expand_categories(joined, column, separator)?;
    let category_columns = expanded.width();
    let (table, duplicates_removed) = append_categories(joined, &expanded, column)?;

    info!(
        rows = table.height(),
        columns = table.width(),
        duplicates_removed,
        "Cleaned data"
    );

    Ok(CleanedData {
        table,
        category_columns,
        duplicates_removed,
    })
}
