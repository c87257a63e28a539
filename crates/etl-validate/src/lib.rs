//! Runtime data-quality checks for datasets handed between pipeline steps.
//!
//! - [`verify_primary_key`]: key columns must identify every row uniquely
//! - [`verify_not_empty`]: a dataset must have at least one row
//! - [`verify_schema`]: a dataset must match a declared [`OutputSchema`]
//!
//! Checks are pure: they never log or retry. On failure they return a
//! [`ValidationError`] carrying the diagnostic; rendering and logging it is
//! up to the caller.
//!
//! [`OutputSchema`]: etl_model::OutputSchema

mod cardinality;
mod diagnostic;
mod emptiness;
mod error;
mod schema;

pub use cardinality::{DIAGNOSTIC_SAMPLE_SIZE, cardinality_diagnostic, verify_primary_key};
pub use diagnostic::{CardinalityDiagnostic, DuplicateGroup};
pub use emptiness::verify_not_empty;
pub use error::{Result, ValidationError};
pub use schema::{SchemaIssue, schema_issues, verify_schema};
