//! Statistical analysis and visualization utilities for two course-style
//! data-analysis projects:
//!
//! - **Screen-time survey analysis**: resampling-based confidence intervals
//!   for the percentage of respondents in each screen-time bin reporting a
//!   positive depression/anxiety score
//! - **Wage-gap analysis**: styled summary tables, income trend charts, and
//!   polynomial OLS regression of wages on sex plus a polynomial predictor,
//!   with predicted male/female curves
//!
//! The crate exposes plain functions over small in-memory tables; there is no
//! CLI, no persistence, and no concurrency.

pub mod analysis;
pub mod common;
pub mod parsing;

// Re-export the types most callers need
pub use analysis::binning::BinnedGroups;
pub use analysis::resampling::ConfidenceInterval;
pub use analysis::regression::WageModel;
pub use common::data_structures::DataTable;
pub use common::plots::PlotError;
pub use parsing::ParsingError;
