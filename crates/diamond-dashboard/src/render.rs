//! Writing a dashboard as JSON and as a standalone HTML page.
//!
//! The page inlines the chart specifications and mounts them with vega-embed
//! from the jsDelivr CDN; everything else is static markup.

use crate::Dashboard;
use crate::error::Result;
use crate::metrics::Gauge;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#262730}\
table{border-collapse:collapse;margin-bottom:1.5rem}\
th,td{border:1px solid #ddd;padding:4px 8px;text-align:right}\
th:first-child,td:first-child{text-align:left}\
.gauges{display:flex;flex-wrap:wrap;gap:1rem}\
.gauge{width:180px;padding:.5rem;border:1px solid #eee}\
.bar{height:10px;background:#f0f2f6}\
.chart{margin:1.5rem 0}";

/// Paths produced by [`write_dashboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardFiles {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Write `dashboard.json` and `dashboard.html` into `dir`, creating it if needed.
pub fn write_dashboard(dashboard: &Dashboard, dir: impl AsRef<Path>) -> Result<DashboardFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json = dir.join("dashboard.json");
    let mut file = File::create(&json)?;
    file.write_all(serde_json::to_string_pretty(dashboard)?.as_bytes())?;

    let html = dir.join("dashboard.html");
    fs::write(&html, render_html(dashboard)?)?;

    info!("Dashboard saved: {}", html.display());
    Ok(DashboardFiles { json, html })
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Render the whole page.
pub fn render_html(dashboard: &Dashboard) -> Result<String> {
    let mut html = String::new();
    let title = match &dashboard.source {
        Some(source) => format!("Batted-ball dashboard: {}", source),
        None => "Batted-ball dashboard".to_string(),
    };

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&title));
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    for src in VEGA_SCRIPTS {
        let _ = writeln!(html, "<script src=\"{}\"></script>", src);
    }
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&title));
    let _ = writeln!(
        html,
        "<p>{} rows, generated {}</p>",
        dashboard.rows,
        escape_html(&dashboard.generated_at)
    );

    render_gauges(&mut html, &dashboard.overall.gauges);
    render_preview(&mut html, dashboard);
    render_batting(&mut html, dashboard);

    for chart in &dashboard.charts {
        let _ = writeln!(
            html,
            "<h2>{}</h2>\n<div class=\"chart\" id=\"{}\"></div>",
            escape_html(&chart.title),
            chart.id
        );
    }

    html.push_str("<script>\n");
    for chart in &dashboard.charts {
        // `</` inside inlined data would close the script element.
        let spec = serde_json::to_string(&chart.spec)?.replace("</", "<\\/");
        let _ = writeln!(html, "vegaEmbed('#{}', {});", chart.id, spec);
    }
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

fn render_gauges(html: &mut String, gauges: &[Gauge]) {
    html.push_str("<h2>Overall metrics</h2>\n<div class=\"gauges\">\n");
    for gauge in gauges {
        let _ = writeln!(
            html,
            "<div class=\"gauge\"><strong>{}</strong><div>{:.3}{}</div>\
             <div class=\"bar\"><div style=\"width:{:.1}%;height:10px;background:{}\"></div></div></div>",
            escape_html(&gauge.title),
            gauge.value,
            escape_html(&gauge.suffix),
            gauge.fraction() * 100.0,
            gauge.color
        );
    }
    html.push_str("</div>\n");
}

fn render_preview(html: &mut String, dashboard: &Dashboard) {
    html.push_str("<h2>Data preview</h2>\n<table>\n<tr><th>column</th><th>count</th><th>mean</th>\
                   <th>std</th><th>min</th><th>25%</th><th>50%</th><th>75%</th><th>max</th></tr>\n");
    for stats in &dashboard.preview {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&stats.column),
            stats.count,
            fmt_opt(stats.mean),
            fmt_opt(stats.std),
            fmt_opt(stats.min),
            fmt_opt(stats.q1),
            fmt_opt(stats.median),
            fmt_opt(stats.q3),
            fmt_opt(stats.max)
        );
    }
    html.push_str("</table>\n");
}

fn render_batting(html: &mut String, dashboard: &Dashboard) {
    html.push_str("<h2>Batting lines</h2>\n<table>\n<tr><th>batter</th><th>AB</th><th>H</th>\
                   <th>1B</th><th>2B</th><th>3B</th><th>HR</th><th>AVG</th></tr>\n");
    for line in &dashboard.batter_lines {
        let l = &line.line;
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.3}</td></tr>",
            escape_html(&line.batter),
            l.at_bats,
            l.hits,
            l.singles,
            l.doubles,
            l.triples,
            l.home_runs,
            l.batting_average
        );
    }
    html.push_str("</table>\n");
}
