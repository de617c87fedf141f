//! Binning of a numeric column into contiguous ranges
//!
//! The screen-time analysis partitions respondents by hours of daily screen
//! time and computes, per bin, the percentage reporting a positive score on
//! the variable of interest. Bin edges are computed once from the source
//! table and reused when resampled tables are binned, so every resample lands
//! on the same grid.

use crate::common::data_structures::{DataTable, TableError};
use thiserror::Error;

/// Errors that can occur during binning
#[derive(Error, Debug)]
pub enum BinningError {
    #[error("Cannot bin an empty column")]
    EmptyColumn,

    #[error("Bin size {0} is not a positive finite number")]
    InvalidBinSize(f64),

    #[error("Binned column contains a non-finite value at row {row}")]
    NonFiniteValue { row: usize },

    #[error("At least two bins are required, got {0}")]
    TooFewBins(usize),

    #[error("Cannot compute a proportional percentage against an empty first bin")]
    EmptyBaseline,

    #[error(transparent)]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, BinningError>;

/// Row indices of a table grouped onto a fixed bin grid
///
/// `groups[i]` holds the rows whose binned value falls in the range starting
/// at `edges[i]`; the final bin is open-ended above. Empty bins are retained
/// so `edges` and `groups` always have the same length.
#[derive(Debug, Clone)]
pub struct BinnedGroups {
    /// Lower edge of each bin, strictly increasing
    pub edges: Vec<f64>,
    /// Row indices per bin, aligned with `edges`
    pub groups: Vec<Vec<usize>>,
}

impl BinnedGroups {
    /// Number of bins
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true when there are no bins
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Computes contiguous bin edges covering a column's value range
///
/// Edges run from the column minimum to the column maximum inclusive in steps
/// of `bin_size`, so discrete data with `bin_size` 1 gets one bin per value.
///
/// # Arguments
/// * `values` - The column to cover; must be non-empty and finite
/// * `bin_size` - Width of each bin; must be positive and finite
pub fn bin_edges(values: &[f64], bin_size: f64) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(BinningError::EmptyColumn);
    }
    if !(bin_size.is_finite() && bin_size > 0.0) {
        return Err(BinningError::InvalidBinSize(bin_size));
    }
    for (row, value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(BinningError::NonFiniteValue { row });
        }
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Index-based generation avoids accumulating float error across edges
    let count = ((max - min) / bin_size).floor() as usize + 1;
    Ok((0..count).map(|i| min + i as f64 * bin_size).collect())
}

/// Bins a column against a fixed edge grid and collects row indices per bin
///
/// A value lands in bin `i` when `edges[i] <= value < edges[i + 1]`; values
/// at or above the last edge land in the last bin, values below the first
/// edge in the first. Empty bins are retained.
pub fn group_with_edges(
    table: &DataTable,
    column: &str,
    edges: &[f64],
) -> Result<BinnedGroups> {
    if edges.is_empty() {
        return Err(BinningError::EmptyColumn);
    }
    let values = table.numeric(column)?;

    let mut groups = vec![Vec::new(); edges.len()];
    for (row, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(BinningError::NonFiniteValue { row });
        }
        let bin = edges.partition_point(|&edge| edge <= value).saturating_sub(1);
        groups[bin].push(row);
    }

    Ok(BinnedGroups {
        edges: edges.to_vec(),
        groups,
    })
}

/// Bins a column of a table, computing the edges from the column itself
///
/// Convenience wrapper pairing [`bin_edges`] with [`group_with_edges`].
pub fn group_to_bins(table: &DataTable, column: &str, bin_size: f64) -> Result<BinnedGroups> {
    let edges = bin_edges(table.numeric(column)?, bin_size)?;
    group_with_edges(table, column, &edges)
}

/// Percentage of rows per bin with a positive value in `variable`
///
/// For each bin, counts the rows whose `variable` value is greater than zero
/// and divides by the bin's row count. Finite results lie in `[0, 100]`; an
/// empty bin yields `f64::NAN` instead of dividing by zero.
pub fn positive_percentages(
    table: &DataTable,
    groups: &BinnedGroups,
    variable: &str,
) -> Result<Vec<f64>> {
    let values = table.numeric(variable)?;

    let mut percentages = Vec::with_capacity(groups.groups.len());
    for group in &groups.groups {
        if group.is_empty() {
            percentages.push(f64::NAN);
            continue;
        }
        let positives = group.iter().filter(|&&row| values[row] > 0.0).count();
        percentages.push(positives as f64 / group.len() as f64 * 100.0);
    }
    Ok(percentages)
}

/// Ratio of the second bin's percentage to the first
///
/// The original projects report this as the "proportional percentage" of the
/// high bin relative to the low bin. Requires at least two bins and a
/// non-zero, non-empty first bin.
pub fn proportional_percentage(percentages: &[f64]) -> Result<f64> {
    if percentages.len() < 2 {
        return Err(BinningError::TooFewBins(percentages.len()));
    }
    let baseline = percentages[0];
    if !baseline.is_finite() || baseline == 0.0 {
        return Err(BinningError::EmptyBaseline);
    }
    Ok(percentages[1] / baseline)
}
