//! In-memory column-oriented table used by all analysis functions
//!
//! [`DataTable`] is the crate's replacement for an ad-hoc spreadsheet row set:
//! named numeric (`f64`) and text (`String`) columns of equal length, with
//! row-wise selection for resampling.

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when constructing or accessing a table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{0}' does not exist in the table")]
    MissingColumn(String),

    #[error("Column '{0}' already exists in the table")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{column}' is {actual}, expected a {expected} column")]
    KindMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Row index {index} is out of bounds for a table of {rows} rows")]
    RowOutOfBounds { index: usize, rows: usize },
}

type Result<T> = core::result::Result<T, TableError>;

/// A single named column, either numeric or text
#[derive(Debug, Clone)]
enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }
}

/// Column-oriented table of named numeric and text columns
///
/// All columns share the same row count at all times. Column insertion order
/// is preserved so formatted output matches the source spreadsheet layout.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    /// Column names in insertion order
    names: Vec<String>,
    /// Column storage keyed by name
    columns: HashMap<String, Column>,
    /// Shared row count of all columns
    rows: usize,
}

impl DataTable {
    /// Creates an empty table with no columns and no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows shared by every column
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns true when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Appends a numeric column
    ///
    /// The first column added determines the table's row count; every later
    /// column must match it.
    pub fn push_numeric_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<()> {
        let name = name.into();
        self.validate_new_column(&name, values.len())?;
        self.names.push(name.clone());
        self.rows = values.len();
        self.columns.insert(name, Column::Numeric(values));
        Ok(())
    }

    /// Appends a text column
    pub fn push_text_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<()> {
        let name = name.into();
        self.validate_new_column(&name, values.len())?;
        self.names.push(name.clone());
        self.rows = values.len();
        self.columns.insert(name, Column::Text(values));
        Ok(())
    }

    /// Returns the values of a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            other => Err(TableError::KindMismatch {
                column: name.to_string(),
                expected: "numeric",
                actual: other.kind(),
            }),
        }
    }

    /// Returns the values of a text column
    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(values) => Ok(values),
            other => Err(TableError::KindMismatch {
                column: name.to_string(),
                expected: "text",
                actual: other.kind(),
            }),
        }
    }

    /// Materializes a new table from the given row indices
    ///
    /// Indices may repeat and appear in any order, which makes this the
    /// primitive behind sampling rows with replacement. Column names, kinds,
    /// and order are preserved.
    pub fn take_rows(&self, indices: &[usize]) -> Result<DataTable> {
        for &index in indices {
            if index >= self.rows {
                return Err(TableError::RowOutOfBounds {
                    index,
                    rows: self.rows,
                });
            }
        }

        let mut taken = DataTable::new();
        for name in &self.names {
            match &self.columns[name] {
                Column::Numeric(values) => {
                    let selected = indices.iter().map(|&i| values[i]).collect();
                    taken.push_numeric_column(name.clone(), selected)?;
                }
                Column::Text(values) => {
                    let selected = indices.iter().map(|&i| values[i].clone()).collect();
                    taken.push_text_column(name.clone(), selected)?;
                }
            }
        }
        taken.rows = indices.len();
        Ok(taken)
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    fn validate_new_column(&self, name: &str, len: usize) -> Result<()> {
        if self.columns.contains_key(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if !self.names.is_empty() && len != self.rows {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows,
                actual: len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DataTable {
        let mut table = DataTable::new();
        table
            .push_numeric_column("screen_time", vec![1.0, 2.0, 3.0])
            .unwrap();
        table
            .push_numeric_column("depression", vec![0.0, 1.0, 2.0])
            .unwrap();
        table
            .push_text_column(
                "label",
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
            )
            .unwrap();
        table
    }

    #[test]
    fn test_column_access() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.numeric("screen_time").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.text("label").unwrap()[1], "b");

        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["screen_time", "depression", "label"]);
    }

    #[test]
    fn test_missing_and_mismatched_columns() {
        let table = sample_table();
        assert!(matches!(
            table.numeric("nope"),
            Err(TableError::MissingColumn(_))
        ));
        assert!(matches!(
            table.numeric("label"),
            Err(TableError::KindMismatch { .. })
        ));
        assert!(matches!(
            table.text("screen_time"),
            Err(TableError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut table = sample_table();
        let result = table.push_numeric_column("extra", vec![1.0]);
        assert!(matches!(result, Err(TableError::LengthMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = sample_table();
        let result = table.push_numeric_column("screen_time", vec![0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(TableError::DuplicateColumn(_))));
    }

    #[test]
    fn test_take_rows_with_repeats() {
        let table = sample_table();
        let taken = table.take_rows(&[2, 0, 2]).unwrap();

        assert_eq!(taken.len(), 3);
        assert_eq!(taken.numeric("screen_time").unwrap(), &[3.0, 1.0, 3.0]);
        assert_eq!(taken.text("label").unwrap(), &["c", "a", "c"]);

        let names: Vec<&str> = taken.column_names().collect();
        assert_eq!(names, vec!["screen_time", "depression", "label"]);
    }

    #[test]
    fn test_take_rows_out_of_bounds() {
        let table = sample_table();
        assert!(matches!(
            table.take_rows(&[0, 3]),
            Err(TableError::RowOutOfBounds { index: 3, rows: 3 })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = DataTable::new();
        assert!(table.is_empty());
        assert_eq!(table.take_rows(&[]).unwrap().len(), 0);
    }
}
