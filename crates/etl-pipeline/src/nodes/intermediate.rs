//! `raw_test` to `intermediate_test`.

use polars::prelude::DataFrame;

use etl_model::{ColumnSpec, OutputSchema};
use etl_transform::standardize_columns;
use etl_validate::{verify_not_empty, verify_primary_key, verify_schema};

use crate::error::NodeError;
use crate::node::Node;

/// Columns that must identify every `intermediate_test` row.
pub const KEY_COLUMNS: [&str; 1] = ["test_column_a"];

pub const INPUT: &str = "raw_test";
pub const OUTPUT: &str = "intermediate_test";
pub const NODE_NAME: &str = "intermediate_test_node";

/// Declared shape of the `intermediate_test` dataset.
pub fn test_schema() -> OutputSchema {
    OutputSchema::new("Test")
        .with_column(ColumnSpec::text("test_column_a").nullable(true))
        .with_column(ColumnSpec::text("test_column_b").nullable(true))
        .strict(true)
}

/// Normalize the raw dataset and check it before passing it on.
///
/// Checks run in a fixed order: key uniqueness, then non-emptiness, then the
/// output schema. An empty frame therefore passes the key check and fails
/// as [`EmptyDataset`](etl_validate::ValidationError::EmptyDataset).
pub fn intermediate_test(df: DataFrame) -> Result<DataFrame, NodeError> {
    let df = standardize_columns(df)?;
    verify_primary_key(&df, &KEY_COLUMNS)?;
    verify_not_empty(&df)?;
    verify_schema(&df, &test_schema())?;
    Ok(df)
}

pub fn node() -> Node {
    Node::new(intermediate_test, INPUT, OUTPUT, NODE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_validate::ValidationError;
    use polars::prelude::*;

    fn validation(err: NodeError) -> ValidationError {
        match err {
            NodeError::Validation(error) => error,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn clean_input_passes_through() {
        let df = df! {
            "test_column_a" => &["abc", "123"],
            "test_column_b" => &["def", "456"],
        }
        .unwrap();
        let out = intermediate_test(df.clone()).unwrap();
        assert!(out.equals_missing(&df));
    }

    #[test]
    fn duplicate_key_fails() {
        let df = df! {
            "test_column_a" => &["abc", "abc"],
            "test_column_b" => &["def", "xyz"],
        }
        .unwrap();
        let err = validation(intermediate_test(df).unwrap_err());
        let diagnostic = err.cardinality_diagnostic().unwrap();
        assert_eq!(diagnostic.group(&[Some("abc")]).unwrap().count, 2);
    }

    #[test]
    fn empty_input_fails_emptiness_not_cardinality() {
        let df = df! {
            "test_column_a" => Vec::<String>::new(),
            "test_column_b" => Vec::<String>::new(),
        }
        .unwrap();
        let err = validation(intermediate_test(df).unwrap_err());
        assert!(matches!(err, ValidationError::EmptyDataset));
    }

    #[test]
    fn raw_headers_and_placeholders_are_normalized() {
        let df = df! {
            "Test Column A" => &["  NULL  ", "x"],
            "Test Column B" => &["1", "NULLIFY"],
        }
        .unwrap();
        let out = intermediate_test(df).unwrap();
        let a = out.column("test_column_a").unwrap();
        assert_eq!(a.null_count(), 1);
        assert_eq!(a.get(0).unwrap(), AnyValue::Null);
        assert_eq!(
            out.column("test_column_b").unwrap().get(1).unwrap(),
            AnyValue::String("NULLIFY")
        );
    }

    #[test]
    fn extra_column_violates_schema() {
        let df = df! {
            "test_column_a" => &["a"],
            "test_column_b" => &["b"],
            "test_column_c" => &["c"],
        }
        .unwrap();
        let err = validation(intermediate_test(df).unwrap_err());
        assert!(matches!(err, ValidationError::SchemaViolation { .. }));
    }
}
