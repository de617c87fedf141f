//! Domain-specific analysis modules
//!
//! This module contains the statistical primitives shared by both projects
//! (binning, resampling, regression) and the end-to-end drivers for:
//! - Screen-time survey analysis (binned percentages with bootstrap CIs)
//! - Wage-gap analysis (group means and polynomial OLS with sex curves)

pub mod binning;
pub mod constants;
pub mod regression;
pub mod resampling;
pub mod screen_time;
pub mod wage_gap;

// Re-export analysis functions for convenience
pub use screen_time::{generate_screen_time_analysis, generate_screen_time_plots};
pub use wage_gap::{generate_wage_gap_analysis, generate_wage_gap_plots};
