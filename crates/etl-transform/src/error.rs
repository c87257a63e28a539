//! Error types for dataset normalization.

use thiserror::Error;

/// Errors that can occur during normalization.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NormalizationError {
    /// Two columns collapse onto the same canonical name.
    #[error("duplicate column after normalization: {name}")]
    DuplicateColumn {
        /// The canonical name shared by more than one column.
        name: String,
    },

    /// A step targets a column the dataset does not have.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;
