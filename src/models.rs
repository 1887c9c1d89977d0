//! Row-oriented view of a table as stored in SQLite.

use rusqlite::types::Value;

/// A table read back from the database, in rowid order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredTable {
    /// Column names in declaration order
    pub columns: Vec<String>,
    /// One entry per row, aligned with `columns`
    pub rows: Vec<Vec<Value>>,
}

impl StoredTable {
    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All cells of the named column
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}
