//! Outlier handling module.
//!
//! Contains functions for flagging anomalous values in numeric columns. Flags
//! are reported only; no row is removed or capped.

use crate::error::{CleaningError, Result};
use crate::profiler::Quartiles;
use crate::schema::LAUNCH_ANGLE;
use crate::types::{LaunchAngleFlags, OutlierReport};
use crate::utils::{numeric_values, render_rows};
use polars::prelude::*;
use tracing::{debug, warn};

/// Handles outlier detection.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Flag values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]` in `col_name`.
    ///
    /// Missing values are never outliers. With a zero IQR every value that
    /// differs from the quartile is flagged.
    pub fn detect(df: &DataFrame, col_name: &str, multiplier: f64) -> Result<OutlierReport> {
        let series = df
            .column(col_name)
            .map_err(|_| CleaningError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series();

        let values = numeric_values(series)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let quartiles =
            Quartiles::of(&present).ok_or_else(|| CleaningError::NoValidValues(col_name.to_string()))?;
        let (lower_bound, upper_bound) = quartiles.fences(multiplier);

        let (row_indices, flagged): (Vec<usize>, Vec<f64>) = values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.map(|val| (idx, val)))
            .filter(|&(_, val)| val < lower_bound || val > upper_bound)
            .unzip();

        debug!(
            "'{}': Q1={:.3} Q3={:.3} bounds=[{:.3}, {:.3}], {} outliers",
            col_name,
            quartiles.q1,
            quartiles.q3,
            lower_bound,
            upper_bound,
            row_indices.len()
        );

        Ok(OutlierReport {
            column: col_name.to_string(),
            q1: quartiles.q1,
            q3: quartiles.q3,
            iqr: quartiles.iqr(),
            lower_bound,
            upper_bound,
            row_indices,
            values: flagged,
        })
    }

    /// Run [`detect`](Self::detect) on each column, in the given order.
    pub fn detect_all<S: AsRef<str>>(
        df: &DataFrame,
        columns: &[S],
        multiplier: f64,
    ) -> Result<Vec<OutlierReport>> {
        columns
            .iter()
            .map(|col| Self::detect(df, col.as_ref(), multiplier))
            .collect()
    }

    /// Rows whose launch angle lies outside `[low, high]`.
    pub fn unusual_launch_angles(df: &DataFrame, low: f64, high: f64) -> Result<LaunchAngleFlags> {
        let series = df
            .column(LAUNCH_ANGLE)
            .map_err(|_| CleaningError::ColumnNotFound(LAUNCH_ANGLE.to_string()))?
            .as_materialized_series();

        let flagged: Vec<usize> = numeric_values(series)?
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some_and(|angle| angle < low || angle > high))
            .map(|(idx, _)| idx)
            .collect();

        if !flagged.is_empty() {
            warn!(
                "{} rows have a launch angle outside [{}, {}]",
                flagged.len(),
                low,
                high
            );
        }

        Ok(LaunchAngleFlags {
            low,
            high,
            rows: render_rows(df, &flagged)?,
        })
    }
}
