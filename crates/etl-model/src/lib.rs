//! Data model definitions shared by the ETL crates.
//!
//! The only model in this crate is the declarative output schema used to
//! check what a transform hands to the next pipeline step.

pub mod schema;

pub use schema::{ColumnSpec, ColumnType, OutputSchema};
