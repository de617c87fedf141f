//! End-to-end wage-gap analysis
//!
//! Fits the polynomial wage model on individual records, predicts male and
//! female wage curves over the predictor's observed range, and renders the
//! regression chart. Also builds the income trend series from the CPS
//! by-category table for the multi-line trend chart.

use crate::analysis::constants::{DEFAULT_POLY_DEGREE, PREDICTION_POINTS};
use crate::analysis::regression::{self, RegressionError, WageModel};
use crate::common::data_structures::{DataTable, TableError};
use crate::common::plots::{self, FontSizes, LabeledSeries, PlotError};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during the wage-gap analysis
#[derive(Error, Debug)]
pub enum WageGapError {
    #[error(transparent)]
    Regression(#[from] RegressionError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, WageGapError>;

/// Configuration of the wage-gap regression
#[derive(Debug, Clone)]
pub struct WageGapConfig {
    /// Numeric wage column
    pub response: String,
    /// Numeric sex-indicator column (1 male, 0 female)
    pub sex_column: String,
    /// Numeric predictor column entering with polynomial terms
    pub predictor: String,
    /// Human-readable predictor name used on chart axes
    pub predictor_label: String,
    /// Highest power of the predictor in the design
    pub degree: usize,
    /// Number of grid points for the predicted curves
    pub prediction_points: usize,
}

impl Default for WageGapConfig {
    fn default() -> Self {
        Self {
            response: "HRLY_INCWAGE".to_string(),
            sex_column: "SEX".to_string(),
            predictor: "AGE".to_string(),
            predictor_label: "Age".to_string(),
            degree: DEFAULT_POLY_DEGREE,
            prediction_points: PREDICTION_POINTS,
        }
    }
}

/// Complete result of the wage-gap regression
#[derive(Debug, Clone, Serialize)]
pub struct WageGapAnalysis {
    /// The fitted polynomial wage model
    pub model: WageModel,
    /// Mean wage per distinct predictor value (the chart's scatter points)
    pub group_means: Vec<(f64, f64)>,
    /// Predictor grid the curves are evaluated on
    pub grid: Vec<f64>,
    /// Predicted wages for the male indicator along the grid
    pub male_curve: Vec<f64>,
    /// Predicted wages for the female indicator along the grid
    pub female_curve: Vec<f64>,
    /// Predictor name used on chart axes
    pub predictor_label: String,
}

/// Fits the wage model and prepares chart data for one predictor
///
/// # Arguments
/// * `table` - Table of individual wage records
/// * `config` - Column names, polynomial degree, and curve resolution
pub fn generate_wage_gap_analysis(
    table: &DataTable,
    config: &WageGapConfig,
) -> Result<WageGapAnalysis> {
    let model = WageModel::fit(
        table,
        &config.response,
        &config.sex_column,
        &config.predictor,
        config.degree,
    )?;
    let group_means = regression::mean_by_group(table, &config.predictor, &config.response)?;

    let grid = model.prediction_grid(config.prediction_points);
    let male_curve = model.predict_curve(1.0, &grid);
    let female_curve = model.predict_curve(0.0, &grid);

    Ok(WageGapAnalysis {
        model,
        group_means,
        grid,
        male_curve,
        female_curve,
        predictor_label: config.predictor_label.clone(),
    })
}

/// Saves the regression chart of a wage-gap analysis
///
/// Writes `wage_regression.png` into `output_dir`: mean wages by predictor
/// value as scatter points, with the predicted male and female curves
/// overlaid.
pub fn generate_wage_gap_plots(analysis: &WageGapAnalysis, output_dir: &Path) -> Result<()> {
    let curves = vec![
        LabeledSeries::new(
            "male",
            analysis
                .grid
                .iter()
                .cloned()
                .zip(analysis.male_curve.iter().cloned())
                .collect(),
        ),
        LabeledSeries::new(
            "female",
            analysis
                .grid
                .iter()
                .cloned()
                .zip(analysis.female_curve.iter().cloned())
                .collect(),
        ),
    ];

    let output_path = output_dir.join("wage_regression.png");
    plots::create_scatter_with_curves(
        &analysis.group_means,
        &curves,
        &format!("Mean Hourly Wage by {}", analysis.predictor_label),
        &analysis.predictor_label,
        "Mean hourly wage",
        &output_path,
        &FontSizes::default(),
    )?;
    Ok(())
}

/// Builds one labelled income series per category row of a CPS table
///
/// The CPS table has a text `Category` column and one numeric column per
/// year; each row becomes a series of (year, income) points sorted by year,
/// ready for [`plots::create_series_plot`].
pub fn income_trend_series(table: &DataTable) -> Result<Vec<LabeledSeries>> {
    let categories = table.text("Category")?;

    // Year columns are the numeric columns whose names parse as numbers
    let mut years: Vec<(f64, String)> = table
        .column_names()
        .filter(|name| *name != "Category")
        .filter_map(|name| name.parse::<f64>().ok().map(|year| (year, name.to_string())))
        .collect();
    years.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut series = Vec::with_capacity(categories.len());
    for (row, category) in categories.iter().enumerate() {
        let mut points = Vec::with_capacity(years.len());
        for (year, column) in &years {
            points.push((*year, table.numeric(column)?[row]));
        }
        series.push(LabeledSeries::new(category.clone(), points));
    }
    Ok(series)
}

/// Saves the income trend chart for a CPS by-category table
///
/// Writes `income_trend.png` into `output_dir`, one line per category.
pub fn generate_income_trend_plot(table: &DataTable, output_dir: &Path) -> Result<()> {
    let series = income_trend_series(table)?;
    let output_path = output_dir.join("income_trend.png");
    plots::create_series_plot(
        &series,
        "Median Weekly Income by Year",
        "Year",
        "Median Weekly Income ($)",
        &output_path,
        &FontSizes::default(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records following wage = 4 + 2*sex + 0.3*age exactly
    fn wage_table() -> DataTable {
        let ages: Vec<f64> = (20..=40).map(|a| a as f64).collect();
        let sexes: Vec<f64> = (0..ages.len()).map(|i| (i % 2) as f64).collect();
        let wages: Vec<f64> = ages
            .iter()
            .zip(&sexes)
            .map(|(a, s)| 4.0 + 2.0 * s + 0.3 * a)
            .collect();

        let mut table = DataTable::new();
        table.push_numeric_column("AGE", ages).unwrap();
        table.push_numeric_column("SEX", sexes).unwrap();
        table.push_numeric_column("HRLY_INCWAGE", wages).unwrap();
        table
    }

    #[test]
    fn test_generate_wage_gap_analysis() {
        let table = wage_table();
        let config = WageGapConfig {
            degree: 1,
            prediction_points: 50,
            ..WageGapConfig::default()
        };
        let analysis = generate_wage_gap_analysis(&table, &config).unwrap();

        assert_eq!(analysis.grid.len(), 50);
        assert_eq!(analysis.male_curve.len(), 50);
        assert_eq!(analysis.female_curve.len(), 50);
        assert_eq!(analysis.group_means.len(), 21);

        // The male and female curves differ by the fitted sex coefficient
        for (male, female) in analysis.male_curve.iter().zip(&analysis.female_curve) {
            assert!((male - female - 2.0).abs() < 1e-6);
        }
        assert!((analysis.model.r_squared - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_generate_wage_gap_analysis_missing_column() {
        let table = wage_table();
        let config = WageGapConfig {
            predictor: "EDUC".to_string(),
            ..WageGapConfig::default()
        };
        let result = generate_wage_gap_analysis(&table, &config);
        assert!(matches!(result, Err(WageGapError::Regression(_))));
    }

    #[test]
    fn test_income_trend_series() {
        let mut table = DataTable::new();
        table
            .push_text_column(
                "Category",
                vec!["White men".to_string(), "White women".to_string()],
            )
            .unwrap();
        // Columns deliberately out of year order
        table.push_numeric_column("2018", vec![1002.0, 817.0]).unwrap();
        table.push_numeric_column("1979", vec![735.0, 578.0]).unwrap();

        let series = income_trend_series(&table).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "White men");
        assert_eq!(series[0].points, vec![(1979.0, 735.0), (2018.0, 1002.0)]);
        assert_eq!(series[1].points, vec![(1979.0, 578.0), (2018.0, 817.0)]);
    }

    #[test]
    fn test_income_trend_series_requires_category() {
        let mut table = DataTable::new();
        table.push_numeric_column("1979", vec![735.0]).unwrap();
        assert!(matches!(
            income_trend_series(&table),
            Err(WageGapError::Table(_))
        ));
    }
}
