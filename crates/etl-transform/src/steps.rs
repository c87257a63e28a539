//! Ordered pipelines of named normalization steps.
//!
//! A [`NormalizationPipeline`] is a list of [`NormalizationStep`]s applied in
//! order. Ordering is explicit and auditable, and each step can be tested on
//! its own.
//!
//! # Example
//!
//! ```ignore
//! use etl_transform::{NormalizationPipeline, NormalizationStep};
//!
//! let pipeline = NormalizationPipeline::standard()
//!     .with_step(NormalizationStep::StripLeadingZeros { column: "account".into() });
//! let df = pipeline.execute(df)?;
//! ```

use polars::prelude::{Column, DataFrame, PolarsResult};

use crate::cleaning::{remove_whitespace, strip_leading_zeros, strip_trailing_float_zero};
use crate::error::{NormalizationError, Result};
use crate::normalize::{lowercase_column_names, nullify_placeholders, underscore_column_names};

/// A single normalization operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationStep {
    /// Lowercase every column name.
    LowercaseColumnNames,
    /// Replace spaces in column names with underscores.
    UnderscoreColumnNames,
    /// Replace whole-cell `NULL` placeholders with nulls.
    NullifyPlaceholders,
    /// Trim and strip leading zeros in one column.
    StripLeadingZeros { column: String },
    /// Drop a trailing `.0` in one column.
    StripTrailingFloatZero { column: String },
    /// Remove all whitespace in one column.
    RemoveWhitespace { column: String },
}

impl NormalizationStep {
    /// Returns a human-readable name for the step.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LowercaseColumnNames => "lowercase column names",
            Self::UnderscoreColumnNames => "underscore column names",
            Self::NullifyPlaceholders => "nullify placeholders",
            Self::StripLeadingZeros { .. } => "strip leading zeros",
            Self::StripTrailingFloatZero { .. } => "strip trailing float zero",
            Self::RemoveWhitespace { .. } => "remove whitespace",
        }
    }

    /// Apply this step to a dataset.
    pub fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        match self {
            Self::LowercaseColumnNames => lowercase_column_names(df),
            Self::UnderscoreColumnNames => underscore_column_names(df),
            Self::NullifyPlaceholders => nullify_placeholders(df),
            Self::StripLeadingZeros { column } => replace_column(df, column, strip_leading_zeros),
            Self::StripTrailingFloatZero { column } => {
                replace_column(df, column, strip_trailing_float_zero)
            }
            Self::RemoveWhitespace { column } => replace_column(df, column, remove_whitespace),
        }
    }
}

/// Ordered list of normalization steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationPipeline {
    steps: Vec<NormalizationStep>,
}

impl NormalizationPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The column standardization applied before every registered transform:
    /// lowercase names, underscore names, nullify placeholders.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                NormalizationStep::LowercaseColumnNames,
                NormalizationStep::UnderscoreColumnNames,
                NormalizationStep::NullifyPlaceholders,
            ],
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: NormalizationStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[NormalizationStep] {
        &self.steps
    }

    /// Run every step in order.
    pub fn execute(&self, df: DataFrame) -> Result<DataFrame> {
        let mut current = df;
        for step in &self.steps {
            tracing::trace!(step = step.display_name(), "applying normalization step");
            current = step.apply(current)?;
        }
        Ok(current)
    }
}

fn replace_column<F>(mut df: DataFrame, name: &str, clean: F) -> Result<DataFrame>
where
    F: Fn(&Column) -> PolarsResult<Column>,
{
    let column = df
        .column(name)
        .map_err(|_| NormalizationError::ColumnNotFound(name.to_string()))?;
    let cleaned = clean(column)?;
    df.with_column(cleaned)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn standard_pipeline_order() {
        let pipeline = NormalizationPipeline::standard();
        let names: Vec<&str> = pipeline
            .steps()
            .iter()
            .map(NormalizationStep::display_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "lowercase column names",
                "underscore column names",
                "nullify placeholders"
            ]
        );
    }

    #[test]
    fn column_steps_run_after_standardization() {
        let df = df! {
            "Account Id" => &[" 0012 ", "NULL"],
        }
        .unwrap();

        let pipeline = NormalizationPipeline::standard().with_step(
            NormalizationStep::StripLeadingZeros {
                column: "account_id".to_string(),
            },
        );
        let result = pipeline.execute(df).unwrap();
        let column = result.column("account_id").unwrap();

        assert_eq!(column.get(0).unwrap(), AnyValue::String("12"));
        assert_eq!(column.get(1).unwrap(), AnyValue::Null);
    }

    #[test]
    fn column_step_on_missing_column_fails() {
        let df = df! {
            "a" => &["1"],
        }
        .unwrap();

        let err = NormalizationStep::RemoveWhitespace {
            column: "b".to_string(),
        }
        .apply(df)
        .unwrap_err();

        assert!(matches!(err, NormalizationError::ColumnNotFound(ref name) if name == "b"));
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let df = df! {
            "Mixed Case" => &["NULL"],
        }
        .unwrap();

        let result = NormalizationPipeline::new().execute(df.clone()).unwrap();

        assert!(result.equals_missing(&df));
    }
}
