//! Bootstrap resampling and confidence-interval estimation
//!
//! A sampling distribution for the per-bin percentage statistic is built by
//! repeatedly resampling the survey table with replacement, binning each
//! sample onto the edges of the source table, and recording the per-bin
//! percentages. Confidence intervals are the empirical quantiles of those
//! per-bin estimates.

use crate::analysis::binning::{self, BinningError};
use crate::common::data_structures::{DataTable, TableError};
use indicatif::ProgressBar;
use rand::Rng;
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};
use thiserror::Error;

/// Errors that can occur during resampling and interval estimation
#[derive(Error, Debug)]
pub enum ResamplingError {
    #[error("At least one resampling iteration is required")]
    ZeroIterations,

    #[error("Confidence level {0} is outside the open interval (0, 100)")]
    InvalidLevel(f64),

    #[error("Cannot compute a confidence interval from an empty estimate set")]
    EmptyEstimates,

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error(transparent)]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, ResamplingError>;

/// A value range expected to contain a statistic with a stated probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
}

/// Per-bin sampling distributions of the percentage statistic
///
/// `estimates[bin]` holds one percentage per resampling iteration; bins that
/// were empty in a given sample contribute `f64::NAN` for that iteration.
#[derive(Debug, Clone)]
pub struct SamplingDistributions {
    /// Bin edges computed once from the source table
    pub edges: Vec<f64>,
    /// Per-bin estimate vectors, aligned with `edges`
    pub estimates: Vec<Vec<f64>>,
}

/// Draws a new table by sampling rows with replacement
///
/// The resampled table has the same row count, column names, and column kinds
/// as the source. An empty table resamples to an empty table.
pub fn resample_rows<R: Rng>(table: &DataTable, rng: &mut R) -> Result<DataTable> {
    if table.is_empty() {
        return Ok(table.clone());
    }
    let indices: Vec<usize> = (0..table.len())
        .map(|_| rng.gen_range(0..table.len()))
        .collect();
    Ok(table.take_rows(&indices)?)
}

/// Builds per-bin sampling distributions of the positive-percentage statistic
///
/// Bin edges are computed once from `group_column` of the source table; each
/// of `iters` iterations resamples the table with replacement, bins the
/// sample onto those fixed edges, and records the per-bin percentage of rows
/// with `variable > 0`.
///
/// # Arguments
/// * `table` - The source survey table
/// * `group_column` - Numeric column whose values define the bins
/// * `variable` - Numeric column tested for positive values
/// * `bin_size` - Width of each bin
/// * `iters` - Number of resampling iterations; must be at least one
/// * `rng` - Random source; seed it for reproducible runs
pub fn sampling_distributions<R: Rng>(
    table: &DataTable,
    group_column: &str,
    variable: &str,
    bin_size: f64,
    iters: usize,
    rng: &mut R,
) -> Result<SamplingDistributions> {
    sampling_distributions_with_progress(
        table,
        group_column,
        variable,
        bin_size,
        iters,
        rng,
        &ProgressBar::hidden(),
    )
}

/// [`sampling_distributions`] with iteration progress reported to a bar
pub fn sampling_distributions_with_progress<R: Rng>(
    table: &DataTable,
    group_column: &str,
    variable: &str,
    bin_size: f64,
    iters: usize,
    rng: &mut R,
    progress: &ProgressBar,
) -> Result<SamplingDistributions> {
    if iters == 0 {
        return Err(ResamplingError::ZeroIterations);
    }

    let edges = binning::bin_edges(table.numeric(group_column)?, bin_size)?;
    let mut estimates = vec![Vec::with_capacity(iters); edges.len()];

    for _ in 0..iters {
        let sample = resample_rows(table, rng)?;
        let groups = binning::group_with_edges(&sample, group_column, &edges)?;
        let percentages = binning::positive_percentages(&sample, &groups, variable)?;
        for (bin, value) in percentages.into_iter().enumerate() {
            estimates[bin].push(value);
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(SamplingDistributions { edges, estimates })
}

/// Computes an empirical confidence interval from a set of estimates
///
/// The interval brackets the central `level` percent of the estimate
/// distribution: its bounds are the `(100 - level) / 2` and
/// `100 - (100 - level) / 2` quantiles. NaN estimates (bins empty in some
/// resamples) are dropped before quantile computation.
///
/// # Arguments
/// * `estimates` - Sampled values of the statistic
/// * `level` - Confidence level in percent, strictly between 0 and 100
pub fn confidence_interval(estimates: &[f64], level: f64) -> Result<ConfidenceInterval> {
    if !(level > 0.0 && level < 100.0) {
        return Err(ResamplingError::InvalidLevel(level));
    }
    let finite: Vec<f64> = estimates.iter().cloned().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(ResamplingError::EmptyEstimates);
    }

    let mut data = Data::new(finite);
    let tail = (100.0 - level) / 200.0;
    Ok(ConfidenceInterval {
        lower: data.quantile(tail),
        upper: data.quantile(1.0 - tail),
    })
}

/// Computes one confidence interval per bin of a sampling distribution
///
/// Bins whose estimates are all NaN (empty in every resample) yield `None`
/// rather than failing the whole computation.
pub fn confidence_intervals(
    groups: &[Vec<f64>],
    level: f64,
) -> Result<Vec<Option<ConfidenceInterval>>> {
    groups
        .iter()
        .map(|estimates| match confidence_interval(estimates, level) {
            Ok(interval) => Ok(Some(interval)),
            Err(ResamplingError::EmptyEstimates) => Ok(None),
            Err(error) => Err(error),
        })
        .collect()
}
