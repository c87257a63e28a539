//! Shared utilities for the ETL workspace crates.

mod cells;

pub use cells::{any_to_text, format_numeric, string_cells};
