//! Batted-Ball Dashboard Library
//!
//! Reads a cleaned batted-ball file and computes batting metrics, correlation
//! and outcome breakdowns, with Vega-Lite chart specifications for each panel.
//!
//! # Overview
//!
//! - **Preview**: row count and descriptive statistics of the measurements
//! - **Correlation**: Pearson matrix and a scatter matrix coloured by outcome
//! - **Outcome mix**: outcome shares inside a launch-angle window
//! - **Outcome focus**: exit-speed distribution and most frequent players
//! - **Batting**: per-batter lines, league line, slugging and gauges
//!
//! Every computation is a pure function of the loaded data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use diamond_dashboard::{Dashboard, DashboardConfig, write_dashboard};
//!
//! let config = DashboardConfig::builder().angle_window(-10, 40).build()?;
//! let dashboard = Dashboard::from_path("cleaned_baseball_data.csv", &config)?;
//! write_dashboard(&dashboard, &config.output_dir)?;
//! ```

pub mod aggregates;
pub mod charts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod render;

pub use aggregates::{
    CorrelationMatrix, HistogramBin, NameCount, OutcomeFocus, OutcomeMix, OutcomeShare,
};
pub use charts::Chart;
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use error::{DashboardError, Result};
pub use metrics::{BatterLine, BattingLine, Gauge, OverallMetrics};
pub use render::{DashboardFiles, escape_html, render_html, write_dashboard};

use chrono::Local;
use diamond_processing::{ColumnStats, DataProfiler, load_events};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Everything the dashboard shows, computed once from the cleaned data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub generated_at: String,
    /// File the data was read from, if any.
    pub source: Option<String>,
    pub rows: usize,
    pub preview: Vec<ColumnStats>,
    pub correlation: CorrelationMatrix,
    pub outcome_mix: OutcomeMix,
    /// `None` when the data holds no outcomes.
    pub outcome_focus: Option<OutcomeFocus>,
    pub batter_lines: Vec<BatterLine>,
    pub overall: OverallMetrics,
    pub top_batters: Vec<BatterLine>,
    pub charts: Vec<Chart>,
}

impl Dashboard {
    /// Load a cleaned file and build its dashboard.
    pub fn from_path(path: impl AsRef<Path>, config: &DashboardConfig) -> Result<Self> {
        let path = path.as_ref();
        let df = load_events(path)?;
        let mut dashboard = Self::build(&df, config)?;
        dashboard.source = Some(path.display().to_string());
        Ok(dashboard)
    }

    /// Build every panel from an in-memory record set.
    pub fn build(df: &DataFrame, config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        let (low, high) = config.angle_window;

        let preview = DataProfiler::describe_numeric(df)?;
        let correlation = aggregates::correlation_matrix(df)?;
        let outcome_mix = aggregates::outcome_mix(df, low, high)?;

        let outcome = Self::focused_outcome(df, config.outcome.as_deref())?;
        let outcome_focus = outcome
            .map(|outcome| {
                aggregates::outcome_focus(df, &outcome, config.histogram_bins, config.top_n)
            })
            .transpose()?;

        let batter_lines = metrics::batter_lines(df)?;
        let overall = metrics::overall_metrics(df)?;
        let top_batters = metrics::top_batters(&batter_lines, config.top_batters);

        let mut charts = vec![
            charts::scatter_matrix(df)?,
            charts::correlation_heatmap(&correlation),
            charts::launch_angle_scatter(df)?,
            charts::outcome_donut(&outcome_mix),
        ];
        if let Some(focus) = &outcome_focus {
            charts.push(charts::exit_speed_histogram(focus));
            charts.push(charts::top_counts_bar(
                "outcome-batters",
                format!("Top {} batters by {} count", focus.top_batters.len(), focus.outcome),
                "Batter",
                &focus.top_batters,
            ));
            charts.push(charts::top_counts_bar(
                "outcome-pitchers",
                format!("Top {} pitchers by {} count", focus.top_pitchers.len(), focus.outcome),
                "Pitcher",
                &focus.top_pitchers,
            ));
        }
        charts.push(charts::top_batters_stacked(&top_batters));

        info!(
            "Built dashboard over {} rows with {} charts",
            df.height(),
            charts.len()
        );

        Ok(Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: None,
            rows: df.height(),
            preview,
            correlation,
            outcome_mix,
            outcome_focus,
            batter_lines,
            overall,
            top_batters,
            charts,
        })
    }

    /// Requested outcome, or the first one in file order.
    fn focused_outcome(df: &DataFrame, requested: Option<&str>) -> Result<Option<String>> {
        let known = aggregates::outcomes_in_file_order(df)?;
        match requested {
            Some(outcome) if known.iter().any(|k| k == outcome) => Ok(Some(outcome.to_string())),
            Some(outcome) => Err(DashboardError::InvalidFilter(format!(
                "outcome '{}' does not occur in the data (known: {})",
                outcome,
                known.join(", ")
            ))),
            None => {
                let first = known.into_iter().next();
                debug!("Defaulting outcome focus to {:?}", first);
                Ok(first)
            }
        }
    }

    /// Chart with the given id.
    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.id == id)
    }
}
