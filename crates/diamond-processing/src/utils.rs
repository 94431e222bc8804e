//! Shared utilities for the cleaning pipeline.
//!
//! Small helpers over polars series used by the loader, cleaner and reporter.

use crate::types::RowTable;
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    ) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category as a string.
pub fn dtype_category_str(dtype: &DataType) -> &'static str {
    match get_dtype_category(dtype) {
        DtypeCategory::Numeric => "numeric",
        DtypeCategory::Datetime => "datetime",
        DtypeCategory::Boolean => "binary",
        DtypeCategory::String => "string",
        DtypeCategory::Other => "other",
    }
}

// =============================================================================
// Series Extraction
// =============================================================================

/// Read a series as `f64` values, keeping nulls in place.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

/// Non-null `f64` values of a series, in row order.
pub fn present_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Read a series as text, keeping nulls in place.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Get a column from a DataFrame as a materialized series.
pub fn column_series<'a>(df: &'a DataFrame, name: &str) -> PolarsResult<&'a Series> {
    Ok(df.column(name)?.as_materialized_series())
}

/// Render selected rows as text, keeping their original positions.
pub fn render_rows(df: &DataFrame, row_indices: &[usize]) -> PolarsResult<RowTable> {
    let columns: Vec<Vec<Option<String>>> = df
        .get_columns()
        .iter()
        .map(|col| string_values(col.as_materialized_series()))
        .collect::<PolarsResult<_>>()?;

    let rows = row_indices
        .iter()
        .map(|&row| columns.iter().map(|col| col[row].clone()).collect())
        .collect();

    Ok(RowTable {
        columns: df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
        row_indices: row_indices.to_vec(),
        rows,
    })
}

// =============================================================================
// Null Filling
// =============================================================================

/// Fill null values in a numeric series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<Option<f64>> = numeric_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::Int32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category_str() {
        assert_eq!(dtype_category_str(&DataType::Float64), "numeric");
        assert_eq!(dtype_category_str(&DataType::String), "string");
        assert_eq!(dtype_category_str(&DataType::Date), "datetime");
        assert_eq!(dtype_category_str(&DataType::Boolean), "binary");
    }

    #[test]
    fn test_numeric_values_keeps_nulls() {
        let series = Series::new("v".into(), &[Some(1i64), None, Some(3)]);
        let values = numeric_values(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(present_values(&series).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_string_values() {
        let series = Series::new("s".into(), &[Some("a"), None, Some("c")]);
        let values = string_values(&series).unwrap();
        assert_eq!(
            values,
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("HANG_TIME".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 2.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.name().as_str(), "HANG_TIME");
        let values: Vec<f64> = filled.f64().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_render_rows() {
        let df = df!(
            "BATTER" => &["Acuna", "Albies", "Riley"],
            "EXIT_SPEED" => &[Some(101.5), None, Some(95.0)]
        )
        .unwrap();

        let table = render_rows(&df, &[1, 2]).unwrap();
        assert_eq!(table.columns, vec!["BATTER", "EXIT_SPEED"]);
        assert_eq!(table.row_indices, vec![1, 2]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec![Some("Albies".to_string()), None]);
        assert_eq!(table.rows[1][0].as_deref(), Some("Riley"));
        assert!(table.rows[1][1].as_deref().unwrap().starts_with("95"));
    }
}
