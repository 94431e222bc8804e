//! Truncation of game timestamps to calendar dates.

use crate::error::{CleaningError, Result};
use crate::utils::string_values;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a date or datetime string and drop the time of day.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}

/// Rewrite `column` as `YYYY-MM-DD` text. Nulls stay null.
///
/// Returns the number of non-null values normalized. A value that is not a
/// recognizable date is fatal.
pub fn normalize_dates(df: &mut DataFrame, column: &str) -> Result<usize> {
    let series = df
        .column(column)
        .map_err(|_| CleaningError::ColumnNotFound(column.to_string()))?
        .as_materialized_series()
        .clone();

    // Temporal dtypes already carry a date; the cast drops the time part.
    let series = match series.dtype() {
        DataType::Datetime(_, _) => series.cast(&DataType::Date)?,
        _ => series,
    };

    let mut normalized = 0;
    let mut dates: Vec<Option<String>> = Vec::with_capacity(series.len());
    for raw in string_values(&series)? {
        match raw {
            None => dates.push(None),
            Some(raw) if raw.trim().is_empty() => dates.push(None),
            Some(raw) => {
                let date = parse_calendar_date(&raw).ok_or_else(|| {
                    CleaningError::TypeConversionFailed {
                        column: column.to_string(),
                        target_type: "Date".to_string(),
                        reason: format!("value '{}' is not a date", raw),
                    }
                })?;
                dates.push(Some(date.format("%Y-%m-%d").to_string()));
                normalized += 1;
            }
        }
    }

    debug!("Normalized {} values in '{}' to calendar dates", normalized, column);
    df.replace(column, Series::new(column.into(), dates))?;
    Ok(normalized)
}
