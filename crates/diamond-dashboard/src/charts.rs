//! Vega-Lite v5 chart specifications with inlined data.
//!
//! Specs are plain JSON so they can be stored in `dashboard.json` and mounted
//! by vega-embed in the HTML page.

use crate::aggregates::{CorrelationMatrix, NameCount, OutcomeFocus, OutcomeMix};
use crate::error::Result;
use crate::metrics::BatterLine;
use diamond_processing::is_numeric_dtype;
use diamond_processing::schema::{
    BATTER, EXIT_SPEED, HANG_TIME, HIT_DISTANCE, HIT_SPIN_RATE, LAUNCH_ANGLE, PITCHER,
    PLAY_OUTCOME,
};
use diamond_processing::utils::{column_series, numeric_values, string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Columns plotted against each other in the scatter matrix.
const MATRIX_ROWS: [&str; 5] = [LAUNCH_ANGLE, EXIT_SPEED, HIT_DISTANCE, HANG_TIME, HIT_SPIN_RATE];
const MATRIX_COLUMNS: [&str; 5] = [HIT_SPIN_RATE, HANG_TIME, HIT_DISTANCE, EXIT_SPEED, LAUNCH_ANGLE];

/// A named chart specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// DOM-safe identifier
    pub id: String,
    pub title: String,
    pub spec: Value,
}

impl Chart {
    fn new(id: &str, title: impl Into<String>, mut spec: Value) -> Self {
        let title = title.into();
        if let Some(obj) = spec.as_object_mut() {
            obj.insert("$schema".to_string(), json!(SCHEMA));
            obj.insert("title".to_string(), json!(title));
        }
        Self {
            id: id.to_string(),
            title,
            spec,
        }
    }

    /// Inlined data values, if the spec carries them at the top level.
    pub fn data_values(&self) -> Option<&Vec<Value>> {
        self.spec.get("data")?.get("values")?.as_array()
    }
}

/// Rows of `df` restricted to `columns`, as JSON objects.
pub fn records(df: &DataFrame, columns: &[&str]) -> Result<Vec<Value>> {
    let mut rows = vec![Map::new(); df.height()];

    for &name in columns {
        let series = column_series(df, name)?;
        if is_numeric_dtype(series.dtype()) {
            for (row, value) in rows.iter_mut().zip(numeric_values(series)?) {
                row.insert(name.to_string(), json!(value));
            }
        } else {
            for (row, value) in rows.iter_mut().zip(string_values(series)?) {
                row.insert(name.to_string(), json!(value));
            }
        }
    }

    Ok(rows.into_iter().map(Value::Object).collect())
}

/// Every measurement plotted against every other, coloured by outcome.
pub fn scatter_matrix(df: &DataFrame) -> Result<Chart> {
    let mut columns = MATRIX_ROWS.to_vec();
    columns.push(PLAY_OUTCOME);
    let values = records(df, &columns)?;

    Ok(Chart::new(
        "correlation-matrix",
        "Features that affect the outcome of a hit",
        json!({
            "data": { "values": values },
            "repeat": { "row": MATRIX_ROWS, "column": MATRIX_COLUMNS },
            "spec": {
                "width": 150,
                "height": 150,
                "mark": "circle",
                "params": [{ "name": "grid", "select": "interval", "bind": "scales" }],
                "encoding": {
                    "x": { "field": { "repeat": "column" }, "type": "quantitative" },
                    "y": { "field": { "repeat": "row" }, "type": "quantitative" },
                    "color": { "field": PLAY_OUTCOME, "type": "nominal" }
                }
            }
        }),
    ))
}

/// Pearson correlation heatmap.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Chart {
    let values: Vec<Value> = matrix
        .columns
        .iter()
        .zip(&matrix.values)
        .flat_map(|(row, correlations)| {
            matrix
                .columns
                .iter()
                .zip(correlations)
                .map(move |(column, r)| json!({ "row": row, "column": column, "r": r }))
        })
        .collect();

    Chart::new(
        "correlation-heatmap",
        "Pearson correlation",
        json!({
            "data": { "values": values },
            "mark": "rect",
            "encoding": {
                "x": { "field": "column", "type": "nominal", "sort": null },
                "y": { "field": "row", "type": "nominal", "sort": null },
                "color": {
                    "field": "r",
                    "type": "quantitative",
                    "scale": { "domain": [-1, 1], "scheme": "redblue" }
                },
                "tooltip": [
                    { "field": "row" },
                    { "field": "column" },
                    { "field": "r", "format": ".3f" }
                ]
            }
        }),
    )
}

/// Launch angle against exit speed.
pub fn launch_angle_scatter(df: &DataFrame) -> Result<Chart> {
    let values = records(
        df,
        &[BATTER, PITCHER, LAUNCH_ANGLE, EXIT_SPEED, PLAY_OUTCOME],
    )?;

    Ok(Chart::new(
        "launch-angle-exit-speed",
        "Launch angle and exit speed by outcome",
        json!({
            "data": { "values": values },
            "mark": { "type": "circle", "size": 60 },
            "params": [{ "name": "zoom", "select": "interval", "bind": "scales" }],
            "encoding": {
                "x": { "field": LAUNCH_ANGLE, "type": "quantitative" },
                "y": { "field": EXIT_SPEED, "type": "quantitative" },
                "color": { "field": PLAY_OUTCOME, "type": "nominal" },
                "tooltip": [
                    { "field": BATTER },
                    { "field": PITCHER },
                    { "field": LAUNCH_ANGLE },
                    { "field": EXIT_SPEED },
                    { "field": PLAY_OUTCOME }
                ]
            }
        }),
    ))
}

/// Donut of outcome shares inside the launch-angle window.
pub fn outcome_donut(mix: &OutcomeMix) -> Chart {
    Chart::new(
        "outcome-mix",
        format!(
            "Percentage of play outcomes, launch angle {} to {}",
            mix.low, mix.high
        ),
        json!({
            "data": { "values": mix.shares },
            "mark": { "type": "arc", "innerRadius": 50 },
            "encoding": {
                "theta": { "field": "percentage", "type": "quantitative" },
                "color": { "field": "outcome", "type": "nominal" },
                "tooltip": [{ "field": "outcome" }, { "field": "percentage" }]
            }
        }),
    )
}

/// Exit-speed histogram with the mean as a rule.
pub fn exit_speed_histogram(focus: &OutcomeFocus) -> Chart {
    Chart::new(
        "exit-speed-distribution",
        format!("Exit speed distribution of {}", focus.outcome),
        json!({
            "layer": [
                {
                    "data": { "values": focus.exit_speed_histogram },
                    "mark": "bar",
                    "encoding": {
                        "x": {
                            "field": "start",
                            "type": "quantitative",
                            "bin": { "binned": true },
                            "title": "Exit Speed (mph)"
                        },
                        "x2": { "field": "end" },
                        "y": { "field": "count", "type": "quantitative" },
                        "tooltip": [{ "field": "count" }]
                    }
                },
                {
                    "data": { "values": [{ "average": focus.average_exit_speed }] },
                    "mark": { "type": "rule", "color": "red", "size": 5 },
                    "encoding": {
                        "x": { "field": "average", "type": "quantitative", "title": "Average Exit Speed" }
                    }
                }
            ]
        }),
    )
}

/// Horizontal bars of the most frequent names.
pub fn top_counts_bar(id: &str, title: impl Into<String>, axis: &str, counts: &[NameCount]) -> Chart {
    Chart::new(
        id,
        title,
        json!({
            "data": { "values": counts },
            "mark": "bar",
            "encoding": {
                "x": { "field": "count", "type": "quantitative", "title": "Count" },
                "y": { "field": "name", "type": "nominal", "sort": "-x", "title": axis }
            }
        }),
    )
}

/// Stacked hit types of the given batters.
pub fn top_batters_stacked(lines: &[BatterLine]) -> Chart {
    let values: Vec<Value> = lines
        .iter()
        .flat_map(|l| {
            [
                ("Home Runs", l.line.home_runs),
                ("Singles", l.line.singles),
                ("Doubles", l.line.doubles),
                ("Triples", l.line.triples),
            ]
            .into_iter()
            .map(|(hit_type, count)| {
                json!({ "Batter": l.batter, "Hit Type": hit_type, "Count": count })
            })
        })
        .collect();

    Chart::new(
        "top-batters",
        format!("Top {} Batters by Batting Average", lines.len()),
        json!({
            "data": { "values": values },
            "width": 800,
            "height": 500,
            "mark": "bar",
            "encoding": {
                "x": { "field": "Batter", "type": "nominal", "sort": "-y", "title": "Batter" },
                "y": { "aggregate": "sum", "field": "Count", "type": "quantitative", "title": "Hit Count" },
                "color": { "field": "Hit Type", "type": "nominal", "title": "Hit Type" },
                "tooltip": [
                    { "field": "Batter" },
                    { "aggregate": "sum", "field": "Count" },
                    { "field": "Hit Type" }
                ]
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::{HistogramBin, OutcomeShare};
    use crate::metrics::BattingLine;

    #[test]
    fn test_records_keep_types_and_nulls() {
        let df = df!(
            "BATTER" => &[Some("Acuna"), None],
            "EXIT_SPEED" => &[Some(101.5), None]
        )
        .unwrap();

        let rows = records(&df, &["BATTER", "EXIT_SPEED"]).unwrap();
        assert_eq!(rows[0], json!({ "BATTER": "Acuna", "EXIT_SPEED": 101.5 }));
        assert_eq!(rows[1], json!({ "BATTER": null, "EXIT_SPEED": null }));
    }

    #[test]
    fn test_chart_header() {
        let mix = OutcomeMix {
            low: -50,
            high: 50,
            rows: 1,
            shares: vec![OutcomeShare {
                outcome: "Single".to_string(),
                count: 1,
                percentage: 100.0,
            }],
        };

        let chart = outcome_donut(&mix);
        assert_eq!(chart.spec["$schema"], SCHEMA);
        assert_eq!(chart.spec["title"], json!(chart.title));
        assert_eq!(chart.spec["mark"]["innerRadius"], 50);
        assert_eq!(chart.data_values().unwrap().len(), 1);
    }

    #[test]
    fn test_top_batters_stacked_melts_hit_types() {
        let lines = vec![BatterLine {
            batter: "Acuna".to_string(),
            line: BattingLine {
                singles: 2,
                home_runs: 1,
                ..BattingLine::default()
            },
        }];

        let chart = top_batters_stacked(&lines);
        let values = chart.data_values().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0]["Hit Type"], "Home Runs");
        assert_eq!(values[1]["Count"], 2);
    }

    #[test]
    fn test_histogram_layers() {
        let focus = OutcomeFocus {
            outcome: "HomeRun".to_string(),
            rows: 1,
            average_exit_speed: 104.0,
            exit_speed_histogram: vec![HistogramBin {
                start: 103.5,
                end: 104.5,
                count: 1,
            }],
            top_batters: Vec::new(),
            top_pitchers: Vec::new(),
        };

        let chart = exit_speed_histogram(&focus);
        assert_eq!(chart.spec["layer"].as_array().unwrap().len(), 2);
        assert_eq!(chart.spec["layer"][1]["data"]["values"][0]["average"], 104.0);
    }
}
