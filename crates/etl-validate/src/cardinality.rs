//! Key uniqueness checks.

use std::collections::HashMap;

use polars::prelude::DataFrame;

use etl_common::string_cells;

use crate::diagnostic::{CardinalityDiagnostic, DuplicateGroup};
use crate::error::{Result, ValidationError};

/// Number of duplicate groups kept in a [`CardinalityDiagnostic`].
pub const DIAGNOSTIC_SAMPLE_SIZE: usize = 5;

/// Verify that `key_columns` uniquely identify every row of `df`.
///
/// Null cells compare equal to each other. A frame with no rows passes.
///
/// # Errors
///
/// - [`ValidationError::InvalidArgument`] if `key_columns` is empty or names
///   a column that is not in `df`
/// - [`ValidationError::CardinalityViolation`] if any key occurs on more than
///   one row; the diagnostic lists the largest groups
pub fn verify_primary_key<S: AsRef<str>>(df: &DataFrame, key_columns: &[S]) -> Result<()> {
    let diagnostic = cardinality_diagnostic(df, key_columns)?;
    if diagnostic.is_unique() {
        return Ok(());
    }
    Err(ValidationError::CardinalityViolation {
        columns: diagnostic.columns.clone(),
        diagnostic,
    })
}

/// Group `df` by `key_columns` and summarize the largest groups.
///
/// Does not fail on duplicates; use [`verify_primary_key`] for that.
pub fn cardinality_diagnostic<S: AsRef<str>>(
    df: &DataFrame,
    key_columns: &[S],
) -> Result<CardinalityDiagnostic> {
    let columns = resolve_key_columns(df, key_columns)?;
    let groups = group_rows(df, &columns)?;
    let distinct_count = groups.len();

    let mut ranked = groups;
    // Stable: equal counts stay in first-occurrence order.
    ranked.sort_by(|left, right| right.count.cmp(&left.count));
    ranked.truncate(DIAGNOSTIC_SAMPLE_SIZE);

    Ok(CardinalityDiagnostic {
        columns,
        row_count: df.height(),
        distinct_count,
        top_groups: ranked,
    })
}

fn resolve_key_columns<S: AsRef<str>>(df: &DataFrame, key_columns: &[S]) -> Result<Vec<String>> {
    if key_columns.is_empty() {
        return Err(ValidationError::InvalidArgument {
            reason: "key column list is empty".to_string(),
        });
    }
    let mut resolved = Vec::with_capacity(key_columns.len());
    for column in key_columns {
        let name = column.as_ref();
        if df.column(name).is_err() {
            return Err(ValidationError::InvalidArgument {
                reason: format!("key column '{name}' not found in dataset"),
            });
        }
        resolved.push(name.to_string());
    }
    Ok(resolved)
}

/// Count rows per key, in order of first occurrence.
fn group_rows(df: &DataFrame, columns: &[String]) -> Result<Vec<DuplicateGroup>> {
    let mut cells = Vec::with_capacity(columns.len());
    for name in columns {
        cells.push(string_cells(df.column(name)?)?);
    }

    let mut index: HashMap<Vec<Option<String>>, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for row in 0..df.height() {
        let key: Vec<Option<String>> = cells.iter().map(|column| column[row].clone()).collect();
        match index.get(&key) {
            Some(&position) => groups[position].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup { key, count: 1 });
            }
        }
    }
    Ok(groups)
}
