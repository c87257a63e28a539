//! Validation behavior on the datasets the `intermediate_test` step sees.

use etl_validate::{
    CardinalityDiagnostic, DuplicateGroup, ValidationError, cardinality_diagnostic,
    verify_not_empty, verify_primary_key,
};
use polars::prelude::*;
use proptest::prelude::*;

#[test]
fn duplicate_key_error_message() {
    let df = df! {
        "test_column_a" => &["abc", "abc"],
        "test_column_b" => &["1", "2"],
    }
    .unwrap();
    let err = verify_primary_key(&df, &["test_column_a"]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Failed to validate dataset cardinality on [test_column_a]: 1 duplicate row(s)");
}

#[test]
fn rendered_groups() {
    let df = df! {
        "test_column_a" => &[Some("abc"), Some("abc"), None, None, None, Some("z")],
        "test_column_b" => &[Some("1"), Some("1"), None, None, None, Some("q")],
    }
    .unwrap();
    let diagnostic = cardinality_diagnostic(&df, &["test_column_a", "test_column_b"]).unwrap();
    let lines = diagnostic.render_groups(str::to_string).join("\n");
    insta::assert_snapshot!(lines, @r#"
    test_column_a=null, test_column_b=null: 3 rows
    test_column_a="abc", test_column_b="1": 2 rows
    test_column_a="z", test_column_b="q": 1 rows
    "#);
}

#[test]
fn rendered_groups_can_mask_values() {
    let group = DuplicateGroup {
        key: vec![Some("secret".to_string())],
        count: 2,
    };
    let rendered = group.render(&["id".to_string()], |_| "[REDACTED]".to_string());
    assert_eq!(rendered, r#"id="[REDACTED]": 2 rows"#);
}

#[test]
fn diagnostic_serializes_to_json() {
    let diagnostic = CardinalityDiagnostic {
        columns: vec!["test_column_a".into()],
        row_count: 2,
        distinct_count: 1,
        top_groups: vec![DuplicateGroup {
            key: vec![Some("abc".into())],
            count: 2,
        }],
    };
    insta::assert_json_snapshot!(diagnostic, @r#"
    {
      "columns": [
        "test_column_a"
      ],
      "row_count": 2,
      "distinct_count": 1,
      "top_groups": [
        {
          "key": [
            "abc"
          ],
          "count": 2
        }
      ]
    }
    "#);
}

#[test]
fn header_only_dataset_is_empty() {
    let df = df! {
        "test_column_a" => Vec::<String>::new(),
        "test_column_b" => Vec::<String>::new(),
    }
    .unwrap();
    assert!(verify_primary_key(&df, &["test_column_a"]).is_ok());
    assert!(matches!(
        verify_not_empty(&df),
        Err(ValidationError::EmptyDataset)
    ));
}

proptest! {
    #[test]
    fn diagnostic_counts_are_consistent(values in prop::collection::vec(prop::option::of("[a-c]"), 0..40)) {
        let df = df! { "k" => values.clone() }.unwrap();
        let diagnostic = cardinality_diagnostic(&df, &["k"]).unwrap();

        prop_assert_eq!(diagnostic.row_count, values.len());
        prop_assert!(diagnostic.top_groups.len() <= etl_validate::DIAGNOSTIC_SAMPLE_SIZE);
        prop_assert!(diagnostic.top_groups.windows(2).all(|pair| pair[0].count >= pair[1].count));

        let mut distinct = values.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(diagnostic.distinct_count, distinct.len());
        prop_assert_eq!(verify_primary_key(&df, &["k"]).is_ok(), distinct.len() == values.len());
    }
}
