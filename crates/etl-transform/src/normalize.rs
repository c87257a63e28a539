//! Column name standardization and `NULL` placeholder removal.
//!
//! Source extracts often carry mixed-case, space-separated headers and the
//! literal text `NULL` where a value is missing. [`standardize_columns`]
//! rewrites both before a transform sees the data:
//!
//! 1. column names are lowercased,
//! 2. spaces in column names become underscores,
//! 3. string cells whose whole text is `NULL` (optionally padded with
//!    whitespace) become null.
//!
//! Cells that merely contain `NULL` (for example `NULLIFY`) are kept.

use std::collections::HashSet;
use std::sync::LazyLock;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use regex::Regex;

use crate::error::{NormalizationError, Result};
use crate::steps::NormalizationPipeline;

static NULL_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*NULL\s*$").expect("NULL placeholder pattern is valid"));

/// Returns true if the whole cell text is a `NULL` placeholder.
pub fn is_null_placeholder(value: &str) -> bool {
    NULL_PLACEHOLDER.is_match(value)
}

/// Apply the standard normalization steps to a dataset.
///
/// Equivalent to `NormalizationPipeline::standard().execute(df)`.
pub fn standardize_columns(df: DataFrame) -> Result<DataFrame> {
    NormalizationPipeline::standard().execute(df)
}

/// Lowercase every column name.
pub fn lowercase_column_names(df: DataFrame) -> Result<DataFrame> {
    rename_columns(&df, str::to_lowercase)
}

/// Replace every space in column names with an underscore.
pub fn underscore_column_names(df: DataFrame) -> Result<DataFrame> {
    rename_columns(&df, |name| name.replace(' ', "_"))
}

/// Replace `NULL` placeholder cells with nulls in every string column.
///
/// Non-string columns are returned unchanged.
pub fn nullify_placeholders(df: DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut replaced = 0usize;

    for column in df.get_columns() {
        if column.dtype() != &DataType::String {
            columns.push(column.clone());
            continue;
        }
        let chunked = column.str()?;
        let values: Vec<Option<&str>> = chunked
            .iter()
            .map(|value| match value {
                Some(text) if is_null_placeholder(text) => {
                    replaced += 1;
                    None
                }
                other => other,
            })
            .collect();
        columns.push(Series::new(column.name().clone(), values).into_column());
    }

    if replaced > 0 {
        tracing::debug!(replaced, "replaced NULL placeholders");
    }

    Ok(DataFrame::new(columns)?)
}

fn rename_columns<F>(df: &DataFrame, rename: F) -> Result<DataFrame>
where
    F: Fn(&str) -> String,
{
    let mut seen: HashSet<String> = HashSet::with_capacity(df.width());
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = rename(column.name().as_str());
        if !seen.insert(name.clone()) {
            return Err(NormalizationError::DuplicateColumn { name });
        }
        columns.push(column.clone().with_name(name.into()));
    }

    Ok(DataFrame::new(columns)?)
}
