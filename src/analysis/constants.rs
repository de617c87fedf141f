//! Shared defaults for the analysis pipelines

/// Default width of a screen-time bin, in hours
pub const DEFAULT_BIN_SIZE: f64 = 1.0;

/// Default number of bootstrap resampling iterations
pub const DEFAULT_RESAMPLE_ITERS: usize = 101;

/// Default confidence level, in percent
pub const DEFAULT_CI_LEVEL: f64 = 90.0;

/// Default polynomial degree of the wage-model predictor terms
pub const DEFAULT_POLY_DEGREE: usize = 4;

/// Number of grid points used when drawing predicted wage curves
pub const PREDICTION_POINTS: usize = 100;
