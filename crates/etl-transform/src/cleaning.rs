//! Per-column text cleaners.
//!
//! These helpers are meant to be composed into transforms that need
//! identifier-style keys (account numbers, product codes) compared as text.
//! Each one casts the column to string first and keeps nulls as nulls.

use polars::prelude::{Column, IntoColumn, NamedFrom, PolarsResult, Series};

use etl_common::string_cells;

/// Trim surrounding whitespace, then strip leading `0` characters.
///
/// `"  007"` becomes `"7"`; `"000"` becomes the empty string.
pub fn strip_leading_zeros(column: &Column) -> PolarsResult<Column> {
    map_text(column, |value| value.trim().trim_start_matches('0').to_string())
}

/// Remove a single trailing `.0` left behind by float formatting.
///
/// `"12.0"` becomes `"12"`; `"12.05"` is unchanged.
pub fn strip_trailing_float_zero(column: &Column) -> PolarsResult<Column> {
    map_text(column, |value| {
        value.strip_suffix(".0").unwrap_or(value).to_string()
    })
}

/// Delete every whitespace character.
pub fn remove_whitespace(column: &Column) -> PolarsResult<Column> {
    map_text(column, |value| {
        value.chars().filter(|ch| !ch.is_whitespace()).collect()
    })
}

fn map_text<F>(column: &Column, f: F) -> PolarsResult<Column>
where
    F: Fn(&str) -> String,
{
    let values: Vec<Option<String>> = string_cells(column)?
        .into_iter()
        .map(|value| value.map(|text| f(&text)))
        .collect();
    Ok(Series::new(column.name().clone(), values).into_column())
}
