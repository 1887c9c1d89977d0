use std::path::Path;

use polars::prelude::{Column, DataFrame, DataType};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::models::StoredTable;

/// One frame column converted to SQLite values
struct SqlColumn {
    name: String,
    sql_type: &'static str,
    values: Vec<Value>,
}

impl SqlColumn {
    /// Integer and boolean columns map to INTEGER, floats to REAL, and
    /// everything else is written as TEXT.
    fn from_column(column: &Column) -> Result<Self> {
        let name = column.name().to_string();
        let (sql_type, values) = match column.dtype() {
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                let cast = column.cast(&DataType::Int64)?;
                let values = cast.i64()?.into_iter().map(|v| v.map_or(Value::Null, Value::Integer)).collect();
                ("INTEGER", values)
            }
            DataType::Float32 | DataType::Float64 => {
                let cast = column.cast(&DataType::Float64)?;
                let values = cast.f64()?.into_iter().map(|v| v.map_or(Value::Null, Value::Real)).collect();
                ("REAL", values)
            }
            _ => {
                let cast = column.cast(&DataType::String)?;
                let values = cast
                    .str()?
                    .into_iter()
                    .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string())))
                    .collect();
                ("TEXT", values)
            }
        };
        Ok(Self { name, sql_type, values })
    }
}

/// SQLite store the final table is written to
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database file, creating it if it does not exist
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Write `df` under `name`, dropping any existing table of that name.
    ///
    /// The drop, create and inserts run in a single transaction. Returns the
    /// number of rows inserted.
    pub fn replace_table(&mut self, name: &str, df: &DataFrame) -> Result<usize> {
        if df.width() == 0 {
            return Err(EtlError::InvalidInput(format!(
                "table '{name}' has no columns to write"
            )));
        }
        let columns = df
            .get_columns()
            .iter()
            .map(SqlColumn::from_column)
            .collect::<Result<Vec<_>>>()?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(name)))?;
        tx.execute_batch(&create_table_sql(name, &columns))?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&insert_sql(name, &columns))?;
            for row in 0..df.height() {
                inserted += stmt.execute(params_from_iter(columns.iter().map(|c| &c.values[row])))?;
            }
        }
        tx.commit()?;

        info!(table = name, rows = inserted, "Replaced table");
        Ok(inserted)
    }

    /// Whether a table of this name exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of rows in a table
    pub fn row_count(&self, name: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(name)),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Read a whole table back, in rowid order
    pub fn read_table(&self, name: &str) -> Result<StoredTable> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_identifier(name)))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| (0..width).map(|i| row.get::<_, Value>(i)).collect())?
            .collect::<rusqlite::Result<Vec<Vec<Value>>>>()?;

        Ok(StoredTable { columns, rows })
    }

    /// Declared column types of a table, as `(name, type)` pairs
    pub fn column_types(&self, name: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(name)))?;
        let columns = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }
}

/// Double-quote an SQL identifier
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(name: &str, columns: &[SqlColumn]) -> String {
    let columns: Vec<String> = columns
        .iter()
        .map(|column| format!("{} {}", quote_identifier(&column.name), column.sql_type))
        .collect();
    format!("CREATE TABLE {} ({})", quote_identifier(name), columns.join(", "))
}

fn insert_sql(name: &str, columns: &[SqlColumn]) -> String {
    let columns: Vec<String> = columns.iter().map(|c| quote_identifier(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(name),
        columns.join(", "),
        placeholders.join(", ")
    )
}
