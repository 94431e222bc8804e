//! Data cleaning operations on the batted-ball record set.
//!
//! This module provides functionality for:
//! - Finding and removing exact duplicate rows
//! - Truncating game dates to calendar dates

mod dates;

pub use dates::{normalize_dates, parse_calendar_date};

use crate::error::Result;
use crate::types::DuplicateReport;
use crate::utils::render_rows;
use polars::prelude::*;
use tracing::{debug, info};

/// Data cleaner for duplicate handling.
///
/// Rows are compared on every column; nulls compare equal.
pub struct DataCleaner;

impl DataCleaner {
    /// Report every row that has an identical twin.
    ///
    /// `count` covers all occurrences; `redundant` is what [`deduplicate`]
    /// would drop.
    ///
    /// [`deduplicate`]: DataCleaner::deduplicate
    pub fn find_duplicates(df: &DataFrame) -> Result<DuplicateReport> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(DuplicateReport {
                count: 0,
                redundant: 0,
                rows: render_rows(df, &[])?,
            });
        }

        let mask = df.is_duplicated()?;
        let duplicated: Vec<usize> = mask
            .into_iter()
            .enumerate()
            .filter(|(_, is_dup)| is_dup.unwrap_or(false))
            .map(|(idx, _)| idx)
            .collect();

        let redundant = if duplicated.is_empty() {
            0
        } else {
            df.height() - Self::unique_rows(df)?.height()
        };

        Ok(DuplicateReport {
            count: duplicated.len(),
            redundant,
            rows: render_rows(df, &duplicated)?,
        })
    }

    /// Drop exact duplicate rows, keeping the first occurrence in original order.
    ///
    /// Returns the deduplicated frame and the number of rows removed.
    pub fn deduplicate(df: DataFrame) -> Result<(DataFrame, usize)> {
        if df.height() == 0 || df.width() == 0 {
            return Ok((df, 0));
        }

        let before = df.height();
        let deduplicated = Self::unique_rows(&df)?;
        let removed = before - deduplicated.height();

        if removed > 0 {
            info!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Ok((deduplicated, removed))
    }

    fn unique_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
        df.unique_stable(None, UniqueKeepStrategy::First, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_values;

    fn events_with_duplicate() -> DataFrame {
        df!(
            "BATTER" => &["Acuna", "Albies", "Acuna", "Riley"],
            "EXIT_SPEED" => &[Some(101.0), Some(95.0), Some(101.0), None],
            "PLAY_OUTCOME" => &["HomeRun", "Single", "HomeRun", "Out"]
        )
        .unwrap()
    }

    #[test]
    fn test_find_duplicates_reports_all_occurrences() {
        let report = DataCleaner::find_duplicates(&events_with_duplicate()).unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(report.redundant, 1);
        assert_eq!(report.rows.row_indices, vec![0, 2]);
        assert_eq!(report.rows.rows[0][0].as_deref(), Some("Acuna"));
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let (df, removed) = DataCleaner::deduplicate(events_with_duplicate()).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(df.height(), 3);
        let batters = string_values(df.column("BATTER").unwrap().as_materialized_series()).unwrap();
        assert_eq!(
            batters,
            vec![
                Some("Acuna".to_string()),
                Some("Albies".to_string()),
                Some("Riley".to_string())
            ]
        );
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let (once, _) = DataCleaner::deduplicate(events_with_duplicate()).unwrap();
        let (twice, removed) = DataCleaner::deduplicate(once.clone()).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(once.height(), twice.height());
        assert_eq!(DataCleaner::find_duplicates(&twice).unwrap().count, 0);
    }

    #[test]
    fn test_nulls_compare_equal() {
        let df = df!(
            "BATTER" => &["Riley", "Riley"],
            "HANG_TIME" => &[None::<f64>, None]
        )
        .unwrap();

        let report = DataCleaner::find_duplicates(&df).unwrap();
        assert_eq!(report.count, 2);

        let (df, removed) = DataCleaner::deduplicate(df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_rows_differing_in_one_field_are_distinct() {
        let df = df!(
            "BATTER" => &["Riley", "Riley"],
            "HANG_TIME" => &[Some(4.0), Some(4.5)]
        )
        .unwrap();

        let report = DataCleaner::find_duplicates(&df).unwrap();
        assert_eq!(report.count, 0);
        assert!(report.rows.is_empty());
    }
}
