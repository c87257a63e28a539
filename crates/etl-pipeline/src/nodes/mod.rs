//! Transform functions registered as pipeline nodes.

pub mod intermediate;

pub use intermediate::{KEY_COLUMNS, intermediate_test, test_schema};
