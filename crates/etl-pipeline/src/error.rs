//! Error types for catalog access and pipeline runs.

use std::path::PathBuf;

use thiserror::Error;

use etl_transform::NormalizationError;
use etl_validate::ValidationError;

/// Errors raised while loading or saving datasets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// Failed to read a catalog or data file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid TOML for a dataset map.
    #[error("failed to parse catalog {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Dataset is neither declared nor held in memory.
    #[error("dataset '{name}' has not been produced and is not in the catalog")]
    DatasetNotFound { name: String },

    /// Declared file does not exist.
    #[error("file for dataset '{name}' not found: {path}")]
    MissingFile { name: String, path: PathBuf },

    /// CSV separator must be a single ASCII character.
    #[error("invalid separator {separator:?} for dataset '{name}'")]
    InvalidSeparator { name: String, separator: char },

    /// Polars failed to read or write a CSV dataset.
    #[error("failed to {action} dataset '{name}' at {path}: {source}")]
    Csv {
        action: &'static str,
        name: String,
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
}

/// Errors raised by a node function.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NodeError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl NodeError {
    /// Returns the validation failure, if that is what stopped the node.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            Self::Normalization(_) => None,
        }
    }
}

/// Errors raised while selecting or running a pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("pipeline '{name}' is not registered")]
    UnknownPipeline { name: String },

    #[error("pipeline does not contain node(s): {}", .names.join(", "))]
    UnknownNodes { names: Vec<String> },

    #[error("pipeline contains no nodes after applying the node and tag filters")]
    EmptySelection,

    #[error("node '{node}' failed: {source}")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PipelineError {
    /// Returns the node error, if a node function failed.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            Self::Node { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
