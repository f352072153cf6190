//! Shared utilities for Laptop Price Studio crates.
//!
//! Reading typed cells out of feature tables and formatting numbers for
//! display both live here so every crate agrees on the same conversions.

pub mod polars;

pub use polars::{cell_to_category, cell_to_f64, format_numeric, format_rupiah, parse_f64};
