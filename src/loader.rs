//! CSV loading and key-based merging of the two input datasets.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{EtlError, Result};

/// Field spellings that are read as missing values.
///
/// Empty fields are always missing.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for reading a CSV file
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Read a CSV file with a header row into a DataFrame.
///
/// Column types are inferred from the whole file.
pub fn read_csv(path: &Path, options: CsvOptions) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(NA_VALUES.iter().map(|value| (*value).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|parse| {
            parse
                .with_separator(options.delimiter)
                .with_null_values(Some(null_values.clone()))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Parsed CSV");
    Ok(df)
}

/// Column names of a frame, in order
#[must_use]
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().into_iter().map(ToString::to_string).collect()
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Cast both key columns to a shared type when their inferred types differ.
///
/// Numeric keys compare by value (`1` matches `1.0`); any other mix compares as
/// text. Returns the left key's original type when a numeric cast was applied,
/// so the joined key can be restored to it.
fn align_key_types(left: &mut DataFrame, right: &mut DataFrame, key: &str) -> Result<Option<DataType>> {
    let left_type = left
        .column(key)
        .map_err(|_| EtlError::missing_column(key, "messages"))?
        .dtype()
        .clone();
    let right_type = right
        .column(key)
        .map_err(|_| EtlError::missing_column(key, "categories"))?
        .dtype()
        .clone();
    if left_type == right_type {
        return Ok(None);
    }

    let numeric = is_numeric(&left_type) && is_numeric(&right_type);
    let common = if numeric { DataType::Float64 } else { DataType::String };
    debug!(key, left = %left_type, right = %right_type, common = %common, "Aligning join key types");

    let cast = left.column(key)?.cast(&common)?;
    left.with_column(cast)?;
    let cast = right.column(key)?.cast(&common)?;
    right.with_column(cast)?;

    Ok(numeric.then_some(left_type))
}

/// Inner join of two frames on a shared key column.
///
/// Output columns are all of `left` followed by the non-key columns of `right`;
/// a non-key name present on both sides gets a `_right` suffix on the right.
/// Rows follow the order of `left`, and a key matching several `right` rows
/// produces one row per match in `right` order. Null keys never match.
pub fn inner_join(left: &DataFrame, right: &DataFrame, key: &str) -> Result<DataFrame> {
    let mut left = left.clone();
    let mut right = right.clone();
    let restore = align_key_types(&mut left, &mut right, key)?;

    let mut args = JoinArgs::new(JoinType::Inner);
    args.maintain_order = MaintainOrderJoin::LeftRight;
    let mut joined = left
        .lazy()
        .join(right.lazy(), [col(key)], [col(key)], args)
        .collect()?;

    if let Some(dtype) = restore {
        let restored = joined.column(key)?.cast(&dtype)?;
        joined.with_column(restored)?;
    }
    Ok(joined)
}

/// Read both input files and merge them on `key`.
pub fn load_data(messages_path: &Path, categories_path: &Path, key: &str, options: CsvOptions) -> Result<LoadedData> {
    info!(path = %messages_path.display(), "Loading messages");
    let messages = read_csv(messages_path, options)?;
    info!(path = %categories_path.display(), "Loading categories");
    let categories = read_csv(categories_path, options)?;

    let joined = inner_join(&messages, &categories, key)?;
    info!(
        messages = messages.height(),
        categories = categories.height(),
        joined = joined.height(),
        "Merged datasets"
    );

    Ok(LoadedData {
        messages_rows: messages.height(),
        categories_rows: categories.height(),
        joined,
    })
}

/// Output of [`load_data`]
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Rows read from the messages file
    pub messages_rows: usize,
    /// Rows read from the categories file
    pub categories_rows: usize,
    /// The merged frame
    pub joined: DataFrame,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    #[test]
    fn test_read_csv_infers_types_and_missing_values() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = write(
            dir.path(),
            "m.csv",
            "id,message,score,maybe\n1,hello,0.5,3\n2,\"a, b\",2,NA\n3,n/a,1.5,\n",
        );
        let df = read_csv(&path, CsvOptions::default()).unwrap();

        assert_eq!(column_names(&df), ["id", "message", "score", "maybe"]);
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("message").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);

        let messages = df.column("message").unwrap().str().unwrap();
        assert_eq!(messages.get(1), Some("a, b"));
        assert_eq!(messages.get(2), None);

        let maybe = df.column("maybe").unwrap().i64().unwrap();
        assert_eq!(maybe.get(0), Some(3));
        assert_eq!(maybe.get(1), None);
        assert_eq!(maybe.get(2), None);
    }

    #[test]
    fn test_read_csv_custom_delimiter() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = write(dir.path(), "m.tsv", "id\tmessage\n1\thello, world\n");
        let df = read_csv(&path, CsvOptions { delimiter: b'\t' }).unwrap();

        assert_eq!(column_names(&df), ["id", "message"]);
        assert_eq!(df.column("message").unwrap().str().unwrap().get(0), Some("hello, world"));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        assert!(read_csv(&dir.path().join("nope.csv"), CsvOptions::default()).is_err());
    }

    #[test]
    fn test_inner_join_keeps_left_order_and_suffixes() {
        let left = df! {
            "id" => &[3i64, 1, 2],
            "note" => &["c", "a", "b"],
        }
        .unwrap();
        let right = df! {
            "note" => &["one", "three", "three-again"],
            "id" => &[1i64, 3, 3],
        }
        .unwrap();

        let joined = inner_join(&left, &right, "id").unwrap();
        assert_eq!(column_names(&joined), ["id", "note", "note_right"]);
        assert_eq!(joined.height(), 3);

        let ids = joined.column("id").unwrap().i64().unwrap();
        let notes = joined.column("note_right").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some(3));
        assert_eq!(notes.get(0), Some("three"));
        assert_eq!(notes.get(1), Some("three-again"));
        assert_eq!(ids.get(2), Some(1));
    }

    #[test]
    fn test_inner_join_matches_integer_and_real_keys() {
        let left = df! {
            "id" => &[1i64, 2, 3],
            "message" => &["help", "ok", "fine"],
        }
        .unwrap();
        let right = df! {
            "id" => &[2.0f64, 1.0, 4.5],
            "categories" => &["related-0", "related-1", "related-1"],
        }
        .unwrap();

        let joined = inner_join(&left, &right, "id").unwrap();
        assert_eq!(joined.height(), 2);
        assert_eq!(joined.column("id").unwrap().dtype(), &DataType::Int64);

        let ids = joined.column("id").unwrap().i64().unwrap();
        assert_eq!(ids.get(0), Some(1));
        assert_eq!(ids.get(1), Some(2));
    }

    #[test]
    fn test_inner_join_skips_null_keys() {
        let left = df! {
            "id" => &[Some(1i64), None],
            "message" => &["help", "lost"],
        }
        .unwrap();
        let right = df! {
            "id" => &[None, Some(1i64)],
            "categories" => &["related-0", "related-1"],
        }
        .unwrap();

        let joined = inner_join(&left, &right, "id").unwrap();
        assert_eq!(joined.height(), 1);
        assert_eq!(joined.column("categories").unwrap().str().unwrap().get(0), Some("related-1"));
    }

    #[test]
    fn test_inner_join_missing_key() {
        let left = df! { "id" => &[1i64] }.unwrap();
        let right = df! { "ident" => &[1i64] }.unwrap();
        assert!(matches!(
            inner_join(&left, &right, "id"),
            Err(EtlError::MissingColumn { .. })
        ));
    }
}
