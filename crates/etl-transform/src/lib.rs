//! Dataset normalization for ETL pipeline steps.
//!
//! This crate provides:
//! - **normalize**: canonical column names and `NULL` placeholder removal
//! - **cleaning**: reusable per-column text cleaners
//! - **steps**: an ordered pipeline of named normalization steps
//!
//! # Example
//!
//! ```ignore
//! use etl_transform::standardize_columns;
//!
//! let normalized = standardize_columns(raw_df)?;
//! ```
//!
//! Every step takes the frame by value and returns a new frame; nothing is
//! retained between calls.

mod error;

pub mod cleaning;
pub mod normalize;
pub mod steps;

pub use cleaning::{remove_whitespace, strip_leading_zeros, strip_trailing_float_zero};
pub use error::{NormalizationError, Result};
pub use normalize::{
    is_null_placeholder, lowercase_column_names, nullify_placeholders, standardize_columns,
    underscore_column_names,
};
pub use steps::{NormalizationPipeline, NormalizationStep};
