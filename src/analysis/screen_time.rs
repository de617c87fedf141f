//! End-to-end screen-time survey analysis
//!
//! Ties the binning and resampling primitives together: bin respondents by
//! daily screen time, compute the per-bin percentage reporting a positive
//! depression/anxiety score, bootstrap the sampling distribution of that
//! percentage, and bracket each bin with a confidence interval.

use crate::analysis::binning::{self, BinningError};
use crate::analysis::constants::{DEFAULT_BIN_SIZE, DEFAULT_CI_LEVEL, DEFAULT_RESAMPLE_ITERS};
use crate::analysis::resampling::{self, ConfidenceInterval, ResamplingError};
use crate::common::data_structures::DataTable;
use crate::common::plots::{self, FontSizes, PlotError};
use crate::common::tables;
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during the screen-time analysis
#[derive(Error, Debug)]
pub enum ScreenTimeError {
    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error(transparent)]
    Resampling(#[from] ResamplingError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, ScreenTimeError>;

/// Configuration of the screen-time analysis
#[derive(Debug, Clone)]
pub struct ScreenTimeConfig {
    /// Numeric column whose values define the bins
    pub group_column: String,
    /// Numeric column tested for positive values
    pub variable: String,
    /// Width of each bin
    pub bin_size: f64,
    /// Number of bootstrap resampling iterations
    pub iters: usize,
    /// Confidence level in percent
    pub ci_level: f64,
}

impl Default for ScreenTimeConfig {
    fn default() -> Self {
        Self {
            group_column: "cmputr_time".to_string(),
            variable: "depression_lvl".to_string(),
            bin_size: DEFAULT_BIN_SIZE,
            iters: DEFAULT_RESAMPLE_ITERS,
            ci_level: DEFAULT_CI_LEVEL,
        }
    }
}

/// Complete result of the screen-time analysis
#[derive(Debug, Clone, Serialize)]
pub struct ScreenTimeAnalysis {
    /// Bin edges computed from the source table
    pub edges: Vec<f64>,
    /// Respondents per bin
    pub counts: Vec<usize>,
    /// Point estimate of the positive percentage per bin (NaN for empty bins)
    pub percentages: Vec<f64>,
    /// Bootstrap confidence interval per bin, `None` where undefined
    pub intervals: Vec<Option<ConfidenceInterval>>,
    /// Ratio of the second bin's percentage to the first, when defined
    pub proportional_percentage: Option<f64>,
    /// Confidence level the intervals were computed at
    pub ci_level: f64,
}

impl ScreenTimeAnalysis {
    /// Renders the per-bin summary as an ASCII table with an optional title
    pub fn format_table(&self, title: Option<&str>) -> String {
        let rows = tables::bin_summaries(&self.edges, &self.counts, &self.percentages);
        tables::format_bin_table(&rows, title)
    }
}

/// Runs the full screen-time analysis against a survey table
///
/// Bins the table on `config.group_column`, computes per-bin positive
/// percentages of `config.variable`, bootstraps their sampling distributions
/// with `config.iters` resamples, and brackets each bin with a confidence
/// interval at `config.ci_level`.
///
/// # Arguments
/// * `table` - The loaded survey table
/// * `config` - Column names, bin width, iteration count, and CI level
/// * `rng` - Random source for the bootstrap; seed it for reproducible runs
pub fn generate_screen_time_analysis<R: Rng>(
    table: &DataTable,
    config: &ScreenTimeConfig,
    rng: &mut R,
) -> Result<ScreenTimeAnalysis> {
    let binned = binning::group_to_bins(table, &config.group_column, config.bin_size)?;
    let percentages = binning::positive_percentages(table, &binned, &config.variable)?;

    let distributions = resampling::sampling_distributions(
        table,
        &config.group_column,
        &config.variable,
        config.bin_size,
        config.iters,
        rng,
    )?;
    let intervals = resampling::confidence_intervals(&distributions.estimates, config.ci_level)?;

    let proportional_percentage = binning::proportional_percentage(&percentages).ok();
    let counts = binned.groups.iter().map(Vec::len).collect();

    Ok(ScreenTimeAnalysis {
        edges: binned.edges,
        counts,
        percentages,
        intervals,
        proportional_percentage,
        ci_level: config.ci_level,
    })
}

/// Saves the confidence-interval chart of a screen-time analysis
///
/// Writes `screen_time_percentage_ci.png` into `output_dir`.
pub fn generate_screen_time_plots(
    analysis: &ScreenTimeAnalysis,
    output_dir: &Path,
) -> Result<()> {
    let output_path = output_dir.join("screen_time_percentage_ci.png");
    plots::create_percentage_ci_plot(
        &analysis.edges,
        &analysis.percentages,
        &analysis.intervals,
        "Positive Depression Score by Screen Time",
        "Screen Time (hours)",
        &output_path,
        &FontSizes::default(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn survey_table() -> DataTable {
        let mut table = DataTable::new();
        table
            .push_numeric_column(
                "cmputr_time",
                vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0],
            )
            .unwrap();
        table
            .push_numeric_column(
                "depression_lvl",
                vec![0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0],
            )
            .unwrap();
        table
    }

    #[test]
    fn test_generate_screen_time_analysis() {
        let table = survey_table();
        let mut rng = StdRng::seed_from_u64(42);
        let analysis =
            generate_screen_time_analysis(&table, &ScreenTimeConfig::default(), &mut rng)
                .unwrap();

        assert_eq!(analysis.edges, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(analysis.counts, vec![3, 3, 3, 3]);

        // Point estimates match the per-bin share of positive scores
        let expected = [100.0 / 3.0, 200.0 / 3.0, 200.0 / 3.0, 100.0];
        for (actual, expected) in analysis.percentages.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-12);
        }

        // Every interval is defined and brackets a percentage
        assert_eq!(analysis.intervals.len(), 4);
        for interval in analysis.intervals.iter().flatten() {
            assert!(interval.lower <= interval.upper);
            assert!((0.0..=100.0).contains(&interval.lower));
            assert!((0.0..=100.0).contains(&interval.upper));
        }

        let ratio = analysis.proportional_percentage.unwrap();
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_analysis_table_rendering() {
        let table = survey_table();
        let mut rng = StdRng::seed_from_u64(42);
        let analysis =
            generate_screen_time_analysis(&table, &ScreenTimeConfig::default(), &mut rng)
                .unwrap();

        let rendered = analysis.format_table(Some("Survey Results"));
        assert!(rendered.contains("Survey Results"));
        assert!(rendered.contains("1-2"));
        assert!(rendered.contains("4+"));
        assert!(rendered.contains("100.00%"));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let table = survey_table();
        let mut rng = StdRng::seed_from_u64(42);
        let config = ScreenTimeConfig {
            group_column: "missing".to_string(),
            ..ScreenTimeConfig::default()
        };

        let result = generate_screen_time_analysis(&table, &config, &mut rng);
        assert!(matches!(result, Err(ScreenTimeError::Binning(_))));
    }
}
