//! Output schema verification.

use std::fmt;

use polars::prelude::DataFrame;
use serde::Serialize;

use etl_model::{ColumnType, OutputSchema};

use crate::error::{Result, ValidationError};

/// One way a dataset departs from its declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaIssue {
    MissingColumn {
        column: String,
    },
    /// Only reported for strict schemas.
    UnexpectedColumn {
        column: String,
    },
    WrongType {
        column: String,
        expected: ColumnType,
        found: String,
    },
    NullValues {
        column: String,
        count: usize,
    },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::UnexpectedColumn { column } => write!(f, "unexpected column '{column}'"),
            Self::WrongType {
                column,
                expected,
                found,
            } => write!(
                f,
                "column '{column}' expected {} but found {found}",
                expected.label()
            ),
            Self::NullValues { column, count } => {
                write!(f, "column '{column}' is not nullable but has {count} null(s)")
            }
        }
    }
}

/// Collect every issue between `df` and `schema`.
///
/// Declared columns are reported in declaration order, then undeclared
/// columns in frame order.
pub fn schema_issues(df: &DataFrame, schema: &OutputSchema) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();

    for spec in &schema.columns {
        let Ok(column) = df.column(&spec.name) else {
            issues.push(SchemaIssue::MissingColumn {
                column: spec.name.clone(),
            });
            continue;
        };
        if !spec.dtype.accepts(column.dtype()) {
            issues.push(SchemaIssue::WrongType {
                column: spec.name.clone(),
                expected: spec.dtype,
                found: column.dtype().to_string(),
            });
        }
        let nulls = column.null_count();
        if !spec.nullable && nulls > 0 {
            issues.push(SchemaIssue::NullValues {
                column: spec.name.clone(),
                count: nulls,
            });
        }
    }

    if schema.strict {
        for name in df.get_column_names() {
            if schema.column(name.as_str()).is_none() {
                issues.push(SchemaIssue::UnexpectedColumn {
                    column: name.to_string(),
                });
            }
        }
    }

    issues
}

/// Verify that `df` satisfies `schema`.
///
/// # Errors
///
/// Returns [`ValidationError::SchemaViolation`] listing every issue found.
pub fn verify_schema(df: &DataFrame, schema: &OutputSchema) -> Result<()> {
    let issues = schema_issues(df, schema);
    if issues.is_empty() {
        return Ok(());
    }
    Err(ValidationError::SchemaViolation {
        schema: schema.name.clone(),
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_model::ColumnSpec;
    use polars::prelude::*;

    fn test_schema() -> OutputSchema {
        OutputSchema::new("Test")
            .with_column(ColumnSpec::text("test_column_a").nullable(true))
            .with_column(ColumnSpec::text("test_column_b").nullable(true))
            .strict(true)
    }

    #[test]
    fn matching_frame_passes() {
        let df = df! {
            "test_column_a" => &[Some("a"), None],
            "test_column_b" => &[Some("x"), Some("y")],
        }
        .unwrap();
        assert!(verify_schema(&df, &test_schema()).is_ok());
    }

    #[test]
    fn strict_schema_rejects_extra_column() {
        let df = df! {
            "test_column_a" => &["a"],
            "test_column_b" => &["b"],
            "extra" => &["c"],
        }
        .unwrap();
        assert_eq!(
            schema_issues(&df, &test_schema()),
            vec![SchemaIssue::UnexpectedColumn {
                column: "extra".into()
            }]
        );
        let lenient = test_schema().strict(false);
        assert!(verify_schema(&df, &lenient).is_ok());
    }

    #[test]
    fn reports_missing_wrong_type_and_nulls() {
        let schema = OutputSchema::new("Ids")
            .with_column(ColumnSpec::new("id", ColumnType::Integer))
            .with_column(ColumnSpec::text("name"))
            .with_column(ColumnSpec::text("code"));
        let df = df! {
            "id" => &["1"],
            "name" => &[None::<&str>],
        }
        .unwrap();
        let issues = schema_issues(&df, &schema);
        assert_eq!(issues.len(), 3);
        assert!(matches!(&issues[0], SchemaIssue::WrongType { column, .. } if column == "id"));
        assert_eq!(
            issues[1],
            SchemaIssue::NullValues {
                column: "name".into(),
                count: 1
            }
        );
        assert_eq!(
            issues[2],
            SchemaIssue::MissingColumn {
                column: "code".into()
            }
        );
    }

    #[test]
    fn violation_message_lists_issues() {
        let df = df! { "test_column_a" => &["a"] }.unwrap();
        let err = verify_schema(&df, &test_schema()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "output does not match schema Test: missing column 'test_column_b'"
        );
    }
}
