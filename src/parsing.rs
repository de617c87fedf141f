//! CSV loading for the project spreadsheets
//!
//! This module loads CSV exports of the survey and labor-statistics
//! spreadsheets into [`DataTable`] values. Loaders exist for the three fixed
//! layouts the projects use, plus a generic [`read_table`] they all share.

use crate::common::data_structures::{DataTable, TableError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a table
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input file has no header row")]
    MissingHeader,

    #[error("Could not parse '{value}' in column '{column}', row {row} as a number")]
    Numeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Options controlling how a CSV file is interpreted
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Columns to keep as text; everything else is parsed as `f64`
    pub text_columns: Vec<String>,
    /// Cell value marking missing data; any row containing one is dropped
    pub missing_marker: Option<String>,
}

/// Loads a CSV file into a [`DataTable`]
///
/// Columns named in `options.text_columns` are kept as strings; all other
/// columns are parsed as `f64`. When `options.missing_marker` is set, any row
/// containing a cell equal to the marker is dropped before parsing, matching
/// the original replace-then-drop cleanup of the source spreadsheets.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `options` - Text-column and missing-data handling
///
/// # Returns
/// * `Ok(DataTable)` - The loaded table, columns in file order
/// * `Err(ParsingError)` - If reading, row shape, or numeric parsing failed
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<DataTable> {
    // Flexible mode so short rows surface as RaggedRow with a row number
    // instead of a bare csv error
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(ParsingError::MissingHeader);
    }

    // Collect surviving rows first so columns can be built in one pass each
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(ParsingError::RaggedRow {
                row: index,
                expected: headers.len(),
                actual: record.len(),
            });
        }
        let fields: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
        if let Some(marker) = &options.missing_marker {
            if fields.iter().any(|f| f == marker) {
                continue;
            }
        }
        rows.push(fields);
    }

    let mut table = DataTable::new();
    for (column_index, header) in headers.iter().enumerate() {
        if options.text_columns.iter().any(|c| c == header) {
            let values = rows.iter().map(|r| r[column_index].clone()).collect();
            table.push_text_column(header.clone(), values)?;
        } else {
            let mut values = Vec::with_capacity(rows.len());
            for (row_index, row) in rows.iter().enumerate() {
                let cell = &row[column_index];
                let value = cell
                    .parse::<f64>()
                    .map_err(|_| ParsingError::Numeric {
                        column: header.clone(),
                        row: row_index,
                        value: cell.clone(),
                    })?;
                values.push(value);
            }
            table.push_numeric_column(header.clone(), values)?;
        }
    }
    Ok(table)
}

/// Loads the screen-time survey export; every column is numeric
pub fn read_survey(path: &Path) -> Result<DataTable> {
    read_table(path, &ReadOptions::default())
}

/// Loads the BLS weekly-income-by-occupation table
///
/// `Occupation` is kept as text; `-` cells mark data the BLS withheld, and
/// rows containing one are dropped.
pub fn read_bls(path: &Path) -> Result<DataTable> {
    read_table(
        path,
        &ReadOptions {
            text_columns: vec!["Occupation".to_string()],
            missing_marker: Some("-".to_string()),
        },
    )
}

/// Loads the CPS weekly-income-by-category table; `Category` is kept as text
pub fn read_cps(path: &Path) -> Result<DataTable> {
    read_table(
        path,
        &ReadOptions {
            text_columns: vec!["Category".to_string()],
            missing_marker: None,
        },
    )
}
