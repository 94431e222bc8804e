//! Data profiling for the reporter.
//!
//! This module captures the observational state of the record set:
//! - Row and column counts
//! - Per-column null counts and dtypes
//! - Descriptive statistics for numeric columns
//!
//! Profiling never modifies the data.

pub mod statistics;

use crate::error::Result;
use crate::pipeline::CleaningStage;
use crate::types::{ColumnProfile, ColumnStats, StageSnapshot};
use crate::utils::{dtype_category_str, is_numeric_dtype, present_values};
use polars::prelude::*;

pub use statistics::{Quartiles, describe, mean, pearson, percentile, sample_std};

/// Data profiler for the reporter's fixed points.
pub struct DataProfiler;

impl DataProfiler {
    /// Null count and dtype of every column, in column order.
    pub fn profile_columns(df: &DataFrame) -> Vec<ColumnProfile> {
        let height = df.height();
        df.get_columns()
            .iter()
            .map(|col| {
                let null_count = col.null_count();
                let null_percentage = if height > 0 {
                    (null_count as f64 / height as f64) * 100.0
                } else {
                    0.0
                };
                ColumnProfile {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    category: dtype_category_str(col.dtype()).to_string(),
                    null_count,
                    null_percentage,
                }
            })
            .collect()
    }

    /// Descriptive statistics of every numeric column.
    pub fn describe_numeric(df: &DataFrame) -> Result<Vec<ColumnStats>> {
        let mut stats = Vec::new();
        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) {
                continue;
            }
            let values = present_values(col.as_materialized_series())?;
            stats.push(describe(col.name().as_str(), &values));
        }
        Ok(stats)
    }

    /// Capture the reporter's view of the data at a stage.
    pub fn snapshot(df: &DataFrame, stage: CleaningStage) -> Result<StageSnapshot> {
        Ok(StageSnapshot {
            stage,
            rows: df.height(),
            columns: df.width(),
            column_profiles: Self::profile_columns(df),
            numeric_stats: Self::describe_numeric(df)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "BATTER" => &["Acuna", "Albies", "Riley"],
            "EXIT_SPEED" => &[Some(101.0), None, Some(95.0)],
            "HANG_TIME" => &[Some(4.0), Some(5.0), Some(6.0)]
        )
        .unwrap()
    }

    #[test]
    fn test_profile_columns() {
        let profiles = DataProfiler::profile_columns(&sample_df());

        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].name, "BATTER");
        assert_eq!(profiles[0].category, "string");
        assert_eq!(profiles[1].null_count, 1);
        assert!((profiles[1].null_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(profiles[2].category, "numeric");
    }

    #[test]
    fn test_describe_numeric_skips_text() {
        let stats = DataProfiler::describe_numeric(&sample_df()).unwrap();

        let columns: Vec<&str> = stats.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["EXIT_SPEED", "HANG_TIME"]);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].mean, Some(98.0));
        assert_eq!(stats[1].median, Some(5.0));
    }

    #[test]
    fn test_snapshot() {
        let snapshot = DataProfiler::snapshot(&sample_df(), CleaningStage::Loaded).unwrap();
        assert_eq!(snapshot.stage, CleaningStage::Loaded);
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.columns, 3);
        assert_eq!(snapshot.total_nulls(), 1);
    }
}
