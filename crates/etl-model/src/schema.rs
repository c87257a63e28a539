//! Declarative output schemas.
//!
//! An [`OutputSchema`] names the columns a transform must produce, the
//! logical type of each one and whether it may hold nulls. Strict schemas
//! additionally reject columns that are not declared.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Logical column type for schema checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// UTF-8 text.
    Text,
    /// Any signed or unsigned integer width.
    Integer,
    /// 32 or 64 bit floating point.
    Float,
    /// Boolean flags.
    Boolean,
}

impl ColumnType {
    /// Returns true if a polars dtype satisfies this logical type.
    ///
    /// An all-null column has dtype `Null` and satisfies every type.
    pub fn accepts(self, dtype: &DataType) -> bool {
        if matches!(dtype, DataType::Null) {
            return true;
        }
        match self {
            Self::Text => matches!(dtype, DataType::String),
            Self::Integer => dtype.is_integer(),
            Self::Float => dtype.is_float(),
            Self::Boolean => matches!(dtype, DataType::Boolean),
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

/// One declared column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: ColumnType,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            nullable: false,
        }
    }

    /// Convenience constructor for a non-nullable text column.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Post-condition describing the columns a transform must return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// Reject columns that are not declared.
    #[serde(default)]
    pub strict: bool,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            strict: false,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Look up a declared column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Declared column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_accepts_string_and_null_dtypes() {
        assert!(ColumnType::Text.accepts(&DataType::String));
        assert!(ColumnType::Text.accepts(&DataType::Null));
        assert!(!ColumnType::Text.accepts(&DataType::Int64));
    }

    #[test]
    fn numeric_types_accept_all_widths() {
        assert!(ColumnType::Integer.accepts(&DataType::Int8));
        assert!(ColumnType::Integer.accepts(&DataType::UInt64));
        assert!(!ColumnType::Integer.accepts(&DataType::Float64));
        assert!(ColumnType::Float.accepts(&DataType::Float32));
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let schema = OutputSchema::new("Test")
            .with_column(ColumnSpec::text("b").nullable(true))
            .with_column(ColumnSpec::text("a"))
            .strict(true);
        let names: Vec<&str> = schema.column_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(schema.strict);
        assert!(schema.column("b").is_some_and(|c| c.nullable));
        assert!(schema.column("a").is_some_and(|c| !c.nullable));
    }
}
