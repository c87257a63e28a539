//! Duplicate-key diagnostics.

use serde::Serialize;

/// One combination of key values and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Key values in key-column order; `None` is a null cell.
    pub key: Vec<Option<String>>,
    /// Number of rows sharing this key.
    pub count: usize,
}

impl DuplicateGroup {
    /// Render as `col="value", col2=null: N rows`, passing each value through `mask`.
    pub fn render<F>(&self, columns: &[String], mask: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let pairs: Vec<String> = columns
            .iter()
            .zip(&self.key)
            .map(|(column, value)| match value {
                Some(text) => format!("{column}={:?}", mask(text)),
                None => format!("{column}=null"),
            })
            .collect();
        format!("{}: {} rows", pairs.join(", "), self.count)
    }
}

/// Summary of how a key column list fails to identify rows.
///
/// `top_groups` holds at most five groups sorted by descending row count;
/// groups with equal counts keep the order in which their key first appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardinalityDiagnostic {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub distinct_count: usize,
    pub top_groups: Vec<DuplicateGroup>,
}

impl CardinalityDiagnostic {
    /// Rows beyond the first for every key.
    pub fn duplicate_rows(&self) -> usize {
        self.row_count.saturating_sub(self.distinct_count)
    }

    /// True if every key identifies exactly one row.
    pub fn is_unique(&self) -> bool {
        self.row_count == self.distinct_count
    }

    /// Find the group for a key, if it made the sample.
    pub fn group(&self, key: &[Option<&str>]) -> Option<&DuplicateGroup> {
        self.top_groups.iter().find(|group| {
            group.key.len() == key.len()
                && group
                    .key
                    .iter()
                    .zip(key)
                    .all(|(left, right)| left.as_deref() == *right)
        })
    }

    /// Render every sampled group, one line each.
    pub fn render_groups<F>(&self, mask: F) -> Vec<String>
    where
        F: Fn(&str) -> String,
    {
        self.top_groups
            .iter()
            .map(|group| group.render(&self.columns, &mask))
            .collect()
    }
}
