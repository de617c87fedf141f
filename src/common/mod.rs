//! Common infrastructure modules shared across both analysis projects
//!
//! This module provides reusable infrastructure for:
//! - The in-memory [`DataTable`] column-oriented table
//! - ASCII table formatting via the [`tabled`] crate
//! - Chart rendering via the [`plotters`] crate
//!
//! [`DataTable`]: data_structures::DataTable

pub mod data_structures;
pub mod plots;
pub mod tables;

// Re-export commonly used items
pub use data_structures::{DataTable, TableError};
pub use plots::PlotError;
