//! Statistical imputation methods.

use crate::error::{CleaningError, Result};
use crate::profiler::mean;
use crate::types::ImputationRecord;
use crate::utils::{fill_numeric_nulls, present_values};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace missing values in `col_name` with the mean of its present values.
    ///
    /// The column becomes `Float64`. A column without any present value cannot
    /// be imputed and is an error.
    pub fn apply_numeric_mean(df: &mut DataFrame, col_name: &str) -> Result<ImputationRecord> {
        let series = df
            .column(col_name)
            .map_err(|_| CleaningError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let missing = series.null_count();
        let values = present_values(&series)?;
        let mean_val = mean(&values).ok_or_else(|| CleaningError::ImputationFailed {
            column: col_name.to_string(),
            reason: "column has no non-missing values".to_string(),
        })?;

        if missing > 0 {
            let filled = fill_numeric_nulls(&series, mean_val)?;
            df.replace(col_name, filled)?;
        }

        debug!(
            "Filled {} values in '{}' with mean {:.4}",
            missing, col_name, mean_val
        );

        Ok(ImputationRecord {
            column: col_name.to_string(),
            values_filled: missing,
            fill_value: mean_val,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::numeric_values;

    #[test]
    fn test_mean_imputation_fills_with_mean_of_present_values() {
        let mut df = df!(
            "HANG_TIME" => &[Some(2.0), None, Some(4.0), None, Some(6.0)]
        )
        .unwrap();

        let record = StatisticalImputer::apply_numeric_mean(&mut df, "HANG_TIME").unwrap();

        assert_eq!(record.values_filled, 2);
        assert_eq!(record.fill_value, 4.0);
        let values = numeric_values(df.column("HANG_TIME").unwrap().as_materialized_series()).unwrap();
        assert_eq!(
            values,
            vec![Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(6.0)]
        );
    }

    #[test]
    fn test_mean_imputation_integer_column() {
        let mut df = df!("HIT_SPIN_RATE" => &[Some(2000i64), None, Some(3000)]).unwrap();

        let record = StatisticalImputer::apply_numeric_mean(&mut df, "HIT_SPIN_RATE").unwrap();

        assert_eq!(record.fill_value, 2500.0);
        let column = df.column("HIT_SPIN_RATE").unwrap();
        assert_eq!(column.null_count(), 0);
        assert_eq!(column.dtype(), &DataType::Float64);
    }

    #[test]
    fn test_mean_imputation_without_nulls_is_noop() {
        let mut df = df!("HANG_TIME" => &[1.0, 2.0]).unwrap();
        let record = StatisticalImputer::apply_numeric_mean(&mut df, "HANG_TIME").unwrap();
        assert_eq!(record.values_filled, 0);
        assert_eq!(record.fill_value, 1.5);
    }

    #[test]
    fn test_mean_imputation_all_null_fails() {
        let mut df = df!("HANG_TIME" => &[None::<f64>, None]).unwrap();
        let err = StatisticalImputer::apply_numeric_mean(&mut df, "HANG_TIME").unwrap_err();
        assert_eq!(err.error_code(), "IMPUTATION_FAILED");
    }

    #[test]
    fn test_mean_imputation_missing_column() {
        let mut df = df!("EXIT_SPEED" => &[1.0]).unwrap();
        let err = StatisticalImputer::apply_numeric_mean(&mut df, "HANG_TIME").unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(_)));
    }
}
