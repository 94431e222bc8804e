//! Batting metrics: per-batter lines, overall line and gauges.
//!
//! At-bats are every event except sacrifices; hits are singles, doubles,
//! triples and home runs. Rates over zero at-bats are 0.

use crate::error::Result;
use diamond_processing::PlayOutcome;
use diamond_processing::schema::{BATTER, HIT_DISTANCE, PITCHER, PLAY_OUTCOME};
use diamond_processing::utils::{column_series, present_values, string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Counting line over a set of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    pub at_bats: usize,
    pub hits: usize,
    pub singles: usize,
    pub doubles: usize,
    pub triples: usize,
    pub home_runs: usize,
    pub batting_average: f64,
}

impl BattingLine {
    /// Accumulate a line from outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a PlayOutcome>) -> Self {
        let mut line = Self::default();
        for outcome in outcomes {
            line.record(outcome);
        }
        line.batting_average = ratio(line.hits, line.at_bats);
        line
    }

    fn record(&mut self, outcome: &PlayOutcome) {
        if outcome.counts_as_at_bat() {
            self.at_bats += 1;
        }
        match outcome {
            PlayOutcome::Single => self.singles += 1,
            PlayOutcome::Double => self.doubles += 1,
            PlayOutcome::Triple => self.triples += 1,
            PlayOutcome::HomeRun => self.home_runs += 1,
            PlayOutcome::Sacrifice | PlayOutcome::Other(_) => return,
        }
        self.hits += 1;
    }

    pub fn total_bases(&self) -> usize {
        self.singles + 2 * self.doubles + 3 * self.triples + 4 * self.home_runs
    }

    /// Total bases per at-bat.
    pub fn slugging(&self) -> f64 {
        ratio(self.total_bases(), self.at_bats)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Batting line of one batter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterLine {
    pub batter: String,
    #[serde(flatten)]
    pub line: BattingLine,
}

/// A dial on the overall-metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub title: String,
    pub value: f64,
    pub max_bound: f64,
    pub suffix: String,
    pub color: String,
}

impl Gauge {
    fn new(title: &str, value: f64, max_bound: f64, suffix: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            value,
            max_bound,
            suffix: suffix.to_string(),
            color: color.to_string(),
        }
    }

    /// Fill fraction of the dial, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.max_bound > 0.0 {
            (self.value / self.max_bound).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// League-wide numbers over every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    #[serde(flatten)]
    pub line: BattingLine,
    pub slugging: f64,
    pub average_distance: f64,
    pub max_distance: f64,
    pub batters: usize,
    pub pitchers: usize,
    pub gauges: Vec<Gauge>,
}

/// Parsed outcome of every row. A missing outcome is an unnamed non-hit.
pub fn outcomes(df: &DataFrame) -> Result<Vec<PlayOutcome>> {
    let labels = string_values(column_series(df, PLAY_OUTCOME)?)?;
    Ok(labels
        .iter()
        .map(|label| PlayOutcome::parse(label.as_deref().unwrap_or_default()))
        .collect())
}

/// One line per batter, sorted by name. Rows without a batter are skipped.
pub fn batter_lines(df: &DataFrame) -> Result<Vec<BatterLine>> {
    let batters = string_values(column_series(df, BATTER)?)?;
    let outcomes = outcomes(df)?;

    let mut grouped: BTreeMap<String, Vec<&PlayOutcome>> = BTreeMap::new();
    for (batter, outcome) in batters.into_iter().zip(&outcomes) {
        if let Some(batter) = batter {
            grouped.entry(batter).or_default().push(outcome);
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(batter, outcomes)| BatterLine {
            batter,
            line: BattingLine::from_outcomes(outcomes),
        })
        .collect())
}

/// Best batters by batting average, ties broken by name.
pub fn top_batters(lines: &[BatterLine], n: usize) -> Vec<BatterLine> {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| {
        b.line
            .batting_average
            .total_cmp(&a.line.batting_average)
            .then_with(|| a.batter.cmp(&b.batter))
    });
    sorted.truncate(n);
    sorted
}

fn distinct(values: Vec<Option<String>>) -> usize {
    values.into_iter().flatten().collect::<HashSet<_>>().len()
}

/// Overall line, distances, player counts and the six gauges.
pub fn overall_metrics(df: &DataFrame) -> Result<OverallMetrics> {
    let outcomes = outcomes(df)?;
    let line = BattingLine::from_outcomes(&outcomes);
    let slugging = line.slugging();

    let distances = present_values(column_series(df, HIT_DISTANCE)?)?;
    let average_distance = diamond_processing::profiler::mean(&distances).unwrap_or(0.0);
    let max_distance = distances.iter().copied().fold(0.0_f64, f64::max);

    let batters = distinct(string_values(column_series(df, BATTER)?)?);
    let pitchers = distinct(string_values(column_series(df, PITCHER)?)?);

    let gauges = vec![
        Gauge::new("Batting Average", line.batting_average, 1.0, "%", "#0068C9"),
        Gauge::new("Total Hits", line.hits as f64, line.at_bats as f64, " H", "#FF8700"),
        Gauge::new("Total Home Runs", line.home_runs as f64, line.hits as f64, " HR", "#FF2B2B"),
        Gauge::new("Average Distance", average_distance, max_distance, " feet", "#CF27F8"),
        Gauge::new(
            "Total batter",
            batters as f64,
            (batters + pitchers) as f64,
            " players",
            "#29B09D",
        ),
        Gauge::new("SLP", slugging, 1.0, " %", "#F8F227"),
    ];

    Ok(OverallMetrics {
        line,
        slugging,
        average_distance,
        max_distance,
        batters,
        pitchers,
        gauges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events() -> DataFrame {
        df!(
            "BATTER" => &["Acuna", "Acuna", "Acuna", "Acuna", "Riley", "Riley"],
            "PITCHER" => &["Nola", "Nola", "Scherzer", "deGrom", "Nola", "Nola"],
            "HIT_DISTANCE" => &[400.0, 200.0, 10.0, 250.0, 300.0, 100.0],
            "PLAY_OUTCOME" => &["HomeRun", "Single", "Out", "Sacrifice", "Double", "Out"]
        )
        .unwrap()
    }

    #[test]
    fn test_batting_line_known_mix() {
        let outcomes: Vec<PlayOutcome> = ["Single", "Double", "Triple", "HomeRun", "Out", "Sacrifice"]
            .iter()
            .map(|label| PlayOutcome::parse(label))
            .collect();

        let line = BattingLine::from_outcomes(&outcomes);

        assert_eq!(line.at_bats, 5);
        assert_eq!(line.hits, 4);
        assert_eq!(line.batting_average, 0.8);
        assert_eq!(line.total_bases(), 10);
        assert_eq!(line.slugging(), 2.0);
    }

    #[test]
    fn test_zero_at_bats() {
        let line = BattingLine::from_outcomes(&[PlayOutcome::Sacrifice]);
        assert_eq!(line.at_bats, 0);
        assert_eq!(line.batting_average, 0.0);
        assert_eq!(line.slugging(), 0.0);
    }

    #[test]
    fn test_batter_lines_sorted_by_name() {
        let lines = batter_lines(&events()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].batter, "Acuna");
        assert_eq!(lines[0].line.at_bats, 3);
        assert_eq!(lines[0].line.hits, 2);
        assert_eq!(lines[1].batter, "Riley");
        assert_eq!(lines[1].line.batting_average, 0.5);
    }

    #[test]
    fn test_top_batters_ties_by_name() {
        let make = |name: &str, avg: f64| BatterLine {
            batter: name.to_string(),
            line: BattingLine {
                batting_average: avg,
                ..BattingLine::default()
            },
        };
        let lines = vec![make("Riley", 0.3), make("Acuna", 0.3), make("Albies", 0.4)];

        let top: Vec<String> = top_batters(&lines, 2).into_iter().map(|l| l.batter).collect();
        assert_eq!(top, vec!["Albies".to_string(), "Acuna".to_string()]);
    }

    #[test]
    fn test_overall_metrics() {
        let metrics = overall_metrics(&events()).unwrap();

        assert_eq!(metrics.line.at_bats, 5);
        assert_eq!(metrics.line.hits, 3);
        assert_eq!(metrics.slugging, (4.0 + 1.0 + 2.0) / 5.0);
        assert_eq!(metrics.average_distance, 1260.0 / 6.0);
        assert_eq!(metrics.max_distance, 400.0);
        assert_eq!((metrics.batters, metrics.pitchers), (2, 3));
        assert_eq!(metrics.gauges.len(), 6);
        assert_eq!(metrics.gauges[1].max_bound, 5.0);
        assert_eq!(metrics.gauges[4].max_bound, 5.0);
    }

    #[test]
    fn test_gauge_fraction() {
        let gauge = Gauge::new("Total Hits", 3.0, 0.0, " H", "#FF8700");
        assert_eq!(gauge.fraction(), 0.0);
        let gauge = Gauge::new("Total Hits", 3.0, 4.0, " H", "#FF8700");
        assert_eq!(gauge.fraction(), 0.75);
    }
}
