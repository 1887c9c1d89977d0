//! Expansion of the delimited categories column.
//!
//! A categories cell looks like `related-1;request-0;offer-0`. Each `;`-position
//! becomes its own column, named after the token found at that position in the
//! first row with the trailing `-<digit>` removed, and holding the digit.
//!
//! Only the first row is consulted for names. Rows with a different number or
//! order of tokens are not checked and produce misaligned or null values.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{EtlError, Result};

/// Number of trailing characters (`-` and the digit) stripped to get a name.
const LABEL_SUFFIX_LEN: usize = 2;

/// Split `column` of `df` into one integer column per category.
///
/// The returned frame has the same number of rows as `df`, in the same order.
/// Cells missing a position hold null.
pub fn expand_categories(df: &DataFrame, column: &str, separator: char) -> Result<DataFrame> {
    let source = df
        .column(column)
        .map_err(|_| EtlError::missing_column(column, "merged dataset"))?;
    let cells = source
        .str()
        .map_err(|_| EtlError::NonTextColumn(column.to_string()))?;

    let tokens: Vec<Vec<&str>> = cells
        .into_iter()
        .map(|cell| cell.map_or_else(Vec::new, |s| s.split(separator).collect()))
        .collect();

    let first = tokens
        .first()
        .ok_or_else(|| EtlError::EmptyTable(column.to_string()))?;
    let width = tokens.iter().map(Vec::len).max().unwrap_or(0);
    let names = category_names(first, width);

    if tokens.iter().any(|row| row.len() != width) {
        warn!(column, width, "Category rows have differing token counts");
    }

    let mut columns = Vec::with_capacity(width);
    for (position, name) in names.iter().enumerate() {
        let values = tokens
            .iter()
            .enumerate()
            .map(|(row, row_tokens)| category_value(row_tokens.get(position).copied(), name, row))
            .collect::<Result<Vec<Option<i64>>>>()?;
        columns.push(Column::new(name.as_str().into(), values));
    }

    debug!(categories = width, rows = tokens.len(), "Expanded categories");
    Ok(DataFrame::new(columns)?)
}

/// Derive column names from the tokens of the first row.
///
/// Positions beyond the first row's tokens are named `category_<position>`.
#[must_use]
pub fn category_names(first_row: &[&str], width: usize) -> Vec<String> {
    (0..width)
        .map(|position| match first_row.get(position) {
            Some(token) => strip_label_suffix(token).to_string(),
            None => format!("category_{position}"),
        })
        .collect()
}

/// Remove the trailing `-<digit>` from a token.
#[must_use]
pub fn strip_label_suffix(token: &str) -> &str {
    let keep = token.chars().count().saturating_sub(LABEL_SUFFIX_LEN);
    match token.char_indices().nth(keep) {
        Some((end, _)) => &token[..end],
        None => token,
    }
}

/// The numeric value of a token: its last character as a digit.
fn category_value(token: Option<&str>, category: &str, row: usize) -> Result<Option<i64>> {
    let Some(last) = token.and_then(|t| t.chars().last()) else {
        return Ok(None);
    };
    last.to_digit(10)
        .map(|digit| Some(i64::from(digit)))
        .ok_or_else(|| EtlError::InvalidCategoryValue {
            category: category.to_string(),
            row,
            value: token.unwrap_or_default().to_string(),
        })
}
