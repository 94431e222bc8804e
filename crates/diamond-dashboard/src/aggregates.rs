//! Aggregations behind the dashboard charts.
//!
//! Every function here is pure over the cleaned record set.

use crate::error::{DashboardError, Result};
use diamond_processing::profiler::{mean, pearson};
use diamond_processing::schema::{BATTER, EXIT_SPEED, LAUNCH_ANGLE, NUMERIC_COLUMNS, PITCHER, PLAY_OUTCOME};
use diamond_processing::utils::{column_series, numeric_values, present_values, string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ============================================================================
// Correlation
// ============================================================================

/// Pearson correlations between the measurement columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlation matrix over [`NUMERIC_COLUMNS`] using pairwise-complete rows.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let series: Vec<Vec<Option<f64>>> = NUMERIC_COLUMNS
        .iter()
        .map(|name| numeric_values(column_series(df, name)?))
        .collect::<PolarsResult<_>>()?;

    let values = series
        .iter()
        .map(|xs| {
            series
                .iter()
                .map(|ys| {
                    let (a, b): (Vec<f64>, Vec<f64>) = xs
                        .iter()
                        .zip(ys)
                        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                        .unzip();
                    pearson(&a, &b)
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

// ============================================================================
// Counting
// ============================================================================

/// A label and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

/// Count non-null values, most frequent first, ties by name.
pub fn value_counts(values: impl IntoIterator<Item = Option<String>>) -> Vec<NameCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<NameCount> = counts
        .into_iter()
        .map(|(name, count)| NameCount { name, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Distinct outcome labels in order of first appearance.
pub fn outcomes_in_file_order(df: &DataFrame) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    Ok(string_values(column_series(df, PLAY_OUTCOME)?)?
        .into_iter()
        .flatten()
        .filter(|label| seen.insert(label.clone()))
        .collect())
}

// ============================================================================
// Outcome Mix
// ============================================================================

/// Share of one outcome inside the launch-angle window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeShare {
    pub outcome: String,
    pub count: usize,
    /// Percent of the window, rounded to two decimals.
    pub percentage: f64,
}

/// Outcome distribution of events with `low <= LAUNCH_ANGLE <= high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMix {
    pub low: i64,
    pub high: i64,
    pub rows: usize,
    pub shares: Vec<OutcomeShare>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rows whose launch angle lies in the inclusive window.
pub fn filter_launch_angle(df: &DataFrame, low: i64, high: i64) -> Result<DataFrame> {
    if low > high {
        return Err(DashboardError::InvalidFilter(format!(
            "launch angle window [{}, {}] is empty",
            low, high
        )));
    }

    Ok(df
        .clone()
        .lazy()
        .filter(
            col(LAUNCH_ANGLE)
                .gt_eq(lit(low as f64))
                .and(col(LAUNCH_ANGLE).lt_eq(lit(high as f64))),
        )
        .collect()?)
}

/// Outcome counts and shares inside the launch-angle window.
pub fn outcome_mix(df: &DataFrame, low: i64, high: i64) -> Result<OutcomeMix> {
    let window = filter_launch_angle(df, low, high)?;
    let counts = value_counts(string_values(column_series(&window, PLAY_OUTCOME)?)?);
    let total: usize = counts.iter().map(|c| c.count).sum();

    let shares = counts
        .into_iter()
        .map(|c| OutcomeShare {
            percentage: round2(c.count as f64 / total as f64 * 100.0),
            outcome: c.name,
            count: c.count,
        })
        .collect();

    debug!("Launch angle window [{}, {}] holds {} rows", low, high, window.height());

    Ok(OutcomeMix {
        low,
        high,
        rows: window.height(),
        shares,
    })
}

// ============================================================================
// Outcome Focus
// ============================================================================

/// One bar of a histogram, `[start, end)` except the last bar which is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the value range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (min, max) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Drill-down for a single outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeFocus {
    pub outcome: String,
    pub rows: usize,
    /// Mean exit speed of the outcome, 0 when there are no rows.
    pub average_exit_speed: f64,
    pub exit_speed_histogram: Vec<HistogramBin>,
    pub top_batters: Vec<NameCount>,
    pub top_pitchers: Vec<NameCount>,
}

/// Rows recording `outcome`.
pub fn filter_outcome(df: &DataFrame, outcome: &str) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(PLAY_OUTCOME).eq(lit(outcome)))
        .collect()?)
}

/// Average exit speed, histogram and most frequent players for `outcome`.
pub fn outcome_focus(df: &DataFrame, outcome: &str, bins: usize, top_n: usize) -> Result<OutcomeFocus> {
    let rows = filter_outcome(df, outcome)?;
    let speeds = present_values(column_series(&rows, EXIT_SPEED)?)?;

    let mut top_batters = value_counts(string_values(column_series(&rows, BATTER)?)?);
    top_batters.truncate(top_n);
    let mut top_pitchers = value_counts(string_values(column_series(&rows, PITCHER)?)?);
    top_pitchers.truncate(top_n);

    Ok(OutcomeFocus {
        outcome: outcome.to_string(),
        rows: rows.height(),
        average_exit_speed: mean(&speeds).unwrap_or(0.0),
        exit_speed_histogram: histogram(&speeds, bins),
        top_batters,
        top_pitchers,
    })
}
