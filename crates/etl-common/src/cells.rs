//! Polars cell helpers.
//!
//! Datasets flowing through the pipeline are treated as text with nullable
//! semantics. These helpers turn polars `AnyValue`s and columns into that
//! view without losing the distinction between null and empty text.

use polars::prelude::{AnyValue, Column, DataType, PolarsResult};

/// Converts a Polars `AnyValue` to text, keeping `Null` as `None`.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            // Display wraps some values in quotes
            if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    };
    Some(text)
}

/// Formats a floating-point number without trailing zeros after the decimal point.
///
/// Integer-valued floats like 40.0 are formatted as "40", not "4".
///
/// # Examples
///
/// ```
/// use etl_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Reads a column as owned text cells.
///
/// Nulls stay `None`. Non-string values are rendered with [`any_to_text`],
/// so integer-valued floats read as `"40"`.
pub fn string_cells(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    if matches!(column.dtype(), DataType::String) {
        return Ok(column
            .str()?
            .iter()
            .map(|value| value.map(str::to_string))
            .collect());
    }
    (0..column.len())
        .map(|index| column.get(index).map(any_to_text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn test_any_to_text_null() {
        assert_eq!(any_to_text(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_text_keeps_empty_strings() {
        assert_eq!(any_to_text(AnyValue::String("")), Some(String::new()));
    }

    #[test]
    fn test_any_to_text_numbers() {
        assert_eq!(any_to_text(AnyValue::Int64(-100)).as_deref(), Some("-100"));
        assert_eq!(any_to_text(AnyValue::Float64(1.5)).as_deref(), Some("1.5"));
        assert_eq!(any_to_text(AnyValue::Float64(1.0)).as_deref(), Some("1"));
        assert_eq!(any_to_text(AnyValue::Boolean(true)).as_deref(), Some("true"));
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(40.50), "40.5");
    }

    #[test]
    fn test_string_cells_casts_integers() {
        let column = Series::new("n".into(), &[Some(1i64), None, Some(30)]).into_column();
        let cells = string_cells(&column).unwrap();
        assert_eq!(
            cells,
            vec![Some("1".to_string()), None, Some("30".to_string())]
        );
    }

    #[test]
    fn test_string_cells_trims_float_zero() {
        let column = Series::new("f".into(), &[Some(40.0f64), Some(2.5)]).into_column();
        let cells = string_cells(&column).unwrap();
        assert_eq!(
            cells,
            vec![Some("40".to_string()), Some("2.5".to_string())]
        );
    }

    #[test]
    fn test_string_cells_keeps_text() {
        let column = Series::new("s".into(), &[Some("abc"), None]).into_column();
        let cells = string_cells(&column).unwrap();
        assert_eq!(cells, vec![Some("abc".to_string()), None]);
    }
}
