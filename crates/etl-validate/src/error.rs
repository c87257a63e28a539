//! Error types for runtime validation.

use thiserror::Error;

use crate::diagnostic::CardinalityDiagnostic;
use crate::schema::SchemaIssue;

/// Errors raised by the runtime checks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Key columns do not uniquely identify rows.
    #[error(
        "Failed to validate dataset cardinality on [{}]: {} duplicate row(s)",
        .columns.join(", "),
        .diagnostic.duplicate_rows()
    )]
    CardinalityViolation {
        /// Key columns that were checked.
        columns: Vec<String>,
        /// Top duplicate groups, largest first.
        diagnostic: CardinalityDiagnostic,
    },

    /// Dataset has zero rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Caller passed arguments the check cannot evaluate.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Dataset does not satisfy its declared output schema.
    #[error(
        "output does not match schema {schema}: {}",
        .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    SchemaViolation {
        schema: String,
        issues: Vec<SchemaIssue>,
    },

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ValidationError {
    /// Returns the cardinality diagnostic when this is a key violation.
    pub fn cardinality_diagnostic(&self) -> Option<&CardinalityDiagnostic> {
        match self {
            Self::CardinalityViolation { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
