use polars::prelude::DataFrame;

use crate::error::{Result, ValidationError};

/// Verify that `df` has at least one row.
///
/// A frame with no columns has no rows and fails as well.
pub fn verify_not_empty(df: &DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Err(ValidationError::EmptyDataset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn rows_pass() {
        let df = df! { "a" => &["1"] }.unwrap();
        assert!(verify_not_empty(&df).is_ok());
    }

    #[test]
    fn zero_rows_fail() {
        let df = df! { "a" => Vec::<String>::new() }.unwrap();
        assert!(matches!(
            verify_not_empty(&df),
            Err(ValidationError::EmptyDataset)
        ));
    }

    #[test]
    fn zero_columns_fail() {
        assert!(verify_not_empty(&DataFrame::empty()).is_err());
    }
}
