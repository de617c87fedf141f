//! OLS regression for the wage-gap analysis
//!
//! Fits weekly or hourly wages against a sex indicator plus polynomial terms
//! of a predictor (age or years of education), then predicts separate male
//! and female wage curves over the predictor's observed range. The linear
//! algebra is a dense SVD least-squares solve via [`nalgebra`].

use crate::common::data_structures::{DataTable, TableError};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Errors that can occur while fitting or evaluating a regression
#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Design matrix has {rows} rows but the response has {responses}")]
    DimensionMismatch { rows: usize, responses: usize },

    #[error("Need at least {parameters} rows to fit {parameters} parameters, got {rows}")]
    TooFewRows { rows: usize, parameters: usize },

    #[error("Polynomial degree must be at least 1, got {0}")]
    InvalidDegree(usize),

    #[error("Least-squares solve failed: {0}")]
    Singular(&'static str),

    #[error("Column '{column}' has no finite values")]
    NoFiniteValues { column: String },

    #[error(transparent)]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, RegressionError>;

/// Result of an ordinary least-squares fit
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    /// Fitted coefficients, one per design-matrix column
    pub coefficients: Vec<f64>,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
}

/// Fits ordinary least squares on a dense design matrix
///
/// Solves `design * beta = response` in the least-squares sense via SVD,
/// which tolerates the strongly correlated polynomial columns the wage model
/// produces.
pub fn fit_ols(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<OlsFit> {
    if design.nrows() != response.len() {
        return Err(RegressionError::DimensionMismatch {
            rows: design.nrows(),
            responses: response.len(),
        });
    }
    if design.nrows() < design.ncols() {
        return Err(RegressionError::TooFewRows {
            rows: design.nrows(),
            parameters: design.ncols(),
        });
    }

    let svd = design.clone().svd(true, true);
    let beta = svd
        .solve(response, 1e-12)
        .map_err(RegressionError::Singular)?;

    let fitted = design * &beta;
    let mean = response.mean();
    let residual_ss: f64 = (response - &fitted).iter().map(|r| r * r).sum();
    let total_ss: f64 = response.iter().map(|y| (y - mean) * (y - mean)).sum();
    let r_squared = if total_ss == 0.0 {
        1.0
    } else {
        1.0 - residual_ss / total_ss
    };

    Ok(OlsFit {
        coefficients: beta.iter().cloned().collect(),
        r_squared,
    })
}

/// Polynomial wage model: `wage ~ sex + x + x^2 + ... + x^degree`
///
/// The sex column is an indicator (1 for male, 0 for female in the source
/// data); the predictor enters with every power up to `degree`.
#[derive(Debug, Clone, Serialize)]
pub struct WageModel {
    /// Coefficients in the order: intercept, sex, x, x^2, ..., x^degree
    pub coefficients: Vec<f64>,
    /// Highest power of the predictor in the design
    pub degree: usize,
    /// Smallest observed predictor value
    pub predictor_min: f64,
    /// Largest observed predictor value
    pub predictor_max: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
}

impl WageModel {
    /// Fits the wage model against a table
    ///
    /// # Arguments
    /// * `table` - Source table of individual records
    /// * `response` - Numeric wage column
    /// * `sex_column` - Numeric sex-indicator column
    /// * `predictor` - Numeric column entering with polynomial terms
    /// * `degree` - Highest predictor power; must be at least 1
    pub fn fit(
        table: &DataTable,
        response: &str,
        sex_column: &str,
        predictor: &str,
        degree: usize,
    ) -> Result<WageModel> {
        if degree == 0 {
            return Err(RegressionError::InvalidDegree(0));
        }
        let wages = table.numeric(response)?;
        let sex = table.numeric(sex_column)?;
        let x = table.numeric(predictor)?;

        let rows = wages.len();
        let parameters = degree + 2;
        if rows < parameters {
            return Err(RegressionError::TooFewRows { rows, parameters });
        }

        let design = DMatrix::from_fn(rows, parameters, |row, column| match column {
            0 => 1.0,
            1 => sex[row],
            power => x[row].powi((power - 1) as i32),
        });
        let fit = fit_ols(&design, &DVector::from_column_slice(wages))?;

        let finite = x.iter().cloned().filter(|v| v.is_finite());
        let predictor_min = finite.clone().fold(f64::INFINITY, f64::min);
        let predictor_max = finite.fold(f64::NEG_INFINITY, f64::max);
        if !predictor_min.is_finite() {
            return Err(RegressionError::NoFiniteValues {
                column: predictor.to_string(),
            });
        }

        Ok(WageModel {
            coefficients: fit.coefficients,
            degree,
            predictor_min,
            predictor_max,
            r_squared: fit.r_squared,
        })
    }

    /// Predicted wage for a single sex indicator and predictor value
    pub fn predict(&self, sex: f64, x: f64) -> f64 {
        let mut wage = self.coefficients[0] + self.coefficients[1] * sex;
        for power in 1..=self.degree {
            wage += self.coefficients[power + 1] * x.powi(power as i32);
        }
        wage
    }

    /// Predicted wages along a predictor grid for a fixed sex indicator
    pub fn predict_curve(&self, sex: f64, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(sex, x)).collect()
    }

    /// Evenly spaced predictor values spanning the observed range
    pub fn prediction_grid(&self, points: usize) -> Vec<f64> {
        linspace(self.predictor_min, self.predictor_max, points)
    }
}

/// Evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Mean of a value column per distinct group value, sorted by group
///
/// The wage plots scatter mean wage by age (or education) under the fitted
/// curves; this computes those points. Rows where either column is non-finite
/// are skipped.
pub fn mean_by_group(
    table: &DataTable,
    group_column: &str,
    value_column: &str,
) -> Result<Vec<(f64, f64)>> {
    let groups = table.numeric(group_column)?;
    let values = table.numeric(value_column)?;

    let mut pairs: Vec<(f64, f64)> = groups
        .iter()
        .zip(values)
        .filter(|(g, v)| g.is_finite() && v.is_finite())
        .map(|(&g, &v)| (g, v))
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut means = Vec::new();
    let mut index = 0;
    while index < pairs.len() {
        let group = pairs[index].0;
        let mut sum = 0.0;
        let mut count = 0usize;
        while index < pairs.len() && pairs[index].0 == group {
            sum += pairs[index].1;
            count += 1;
            index += 1;
        }
        means.push((group, sum / count as f64));
    }
    Ok(means)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic wage table following wage = 5 + 3*sex + 0.5*x exactly
    fn linear_wage_table() -> DataTable {
        let xs = [20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0];
        let sexes = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let wages: Vec<f64> = xs
            .iter()
            .zip(&sexes)
            .map(|(x, s)| 5.0 + 3.0 * s + 0.5 * x)
            .collect();

        let mut table = DataTable::new();
        table.push_numeric_column("AGE", xs.to_vec()).unwrap();
        table.push_numeric_column("SEX", sexes.to_vec()).unwrap();
        table.push_numeric_column("HRLY_INCWAGE", wages).unwrap();
        table
    }

    #[test]
    fn test_fit_ols_recovers_linear_coefficients() {
        let design = DMatrix::from_row_slice(
            4,
            2,
            &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0],
        );
        let response = DVector::from_column_slice(&[3.0, 5.0, 7.0, 9.0]);

        let fit = fit_ols(&design, &response).unwrap();
        assert!((fit.coefficients[0] - 1.0).abs() < 1e-8);
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-8);
        assert!((fit.r_squared - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_fit_ols_dimension_checks() {
        let design = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 2.0]);
        let short = DVector::from_column_slice(&[1.0]);
        assert!(matches!(
            fit_ols(&design, &short),
            Err(RegressionError::DimensionMismatch { .. })
        ));

        let wide = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let response = DVector::from_column_slice(&[1.0]);
        assert!(matches!(
            fit_ols(&wide, &response),
            Err(RegressionError::TooFewRows { .. })
        ));
    }

    #[test]
    fn test_wage_model_recovers_sex_gap() {
        let table = linear_wage_table();
        let model = WageModel::fit(&table, "HRLY_INCWAGE", "SEX", "AGE", 1).unwrap();

        assert!((model.coefficients[0] - 5.0).abs() < 1e-6);
        assert!((model.coefficients[1] - 3.0).abs() < 1e-6);
        assert!((model.coefficients[2] - 0.5).abs() < 1e-6);
        assert!((model.r_squared - 1.0).abs() < 1e-8);
        assert_eq!(model.predictor_min, 20.0);
        assert_eq!(model.predictor_max, 55.0);
    }

    #[test]
    fn test_wage_model_predict_curves_differ_by_gap() {
        let table = linear_wage_table();
        let model = WageModel::fit(&table, "HRLY_INCWAGE", "SEX", "AGE", 1).unwrap();

        let grid = model.prediction_grid(10);
        assert_eq!(grid.len(), 10);
        assert_eq!(grid[0], 20.0);
        assert_eq!(grid[9], 55.0);

        let male = model.predict_curve(1.0, &grid);
        let female = model.predict_curve(0.0, &grid);
        for (m, f) in male.iter().zip(&female) {
            assert!((m - f - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wage_model_rejects_degenerate_input() {
        let table = linear_wage_table();
        assert!(matches!(
            WageModel::fit(&table, "HRLY_INCWAGE", "SEX", "AGE", 0),
            Err(RegressionError::InvalidDegree(0))
        ));
        assert!(matches!(
            WageModel::fit(&table, "HRLY_INCWAGE", "SEX", "AGE", 7),
            Err(RegressionError::TooFewRows { .. })
        ));
        assert!(matches!(
            WageModel::fit(&table, "missing", "SEX", "AGE", 1),
            Err(RegressionError::Table(_))
        ));
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_mean_by_group() {
        let mut table = DataTable::new();
        table
            .push_numeric_column("AGE", vec![30.0, 20.0, 30.0, 20.0, 40.0])
            .unwrap();
        table
            .push_numeric_column("WAGE", vec![12.0, 8.0, 14.0, 10.0, 20.0])
            .unwrap();

        let means = mean_by_group(&table, "AGE", "WAGE").unwrap();
        assert_eq!(means, vec![(20.0, 9.0), (30.0, 13.0), (40.0, 20.0)]);
    }

    #[test]
    fn test_mean_by_group_skips_non_finite() {
        let mut table = DataTable::new();
        table
            .push_numeric_column("AGE", vec![20.0, f64::NAN, 20.0])
            .unwrap();
        table
            .push_numeric_column("WAGE", vec![10.0, 99.0, f64::NAN])
            .unwrap();

        let means = mean_by_group(&table, "AGE", "WAGE").unwrap();
        assert_eq!(means, vec![(20.0, 10.0)]);
    }
}
