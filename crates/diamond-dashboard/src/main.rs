//! CLI entry point for the batted-ball dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use diamond_dashboard::{Dashboard, DashboardConfig, write_dashboard};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Batted-ball dashboard over a cleaned file",
    long_about = "Computes batting lines, correlation and outcome breakdowns from a \
                  cleaned batted-ball CSV and writes dashboard.json and dashboard.html.\n\n\
                  EXAMPLES:\n  \
                  # Build ./dashboard/dashboard.html\n  \
                  diamond-dashboard -i cleaned_baseball_data.csv\n\n  \
                  # Narrow the outcome mix and focus on home runs\n  \
                  diamond-dashboard -i cleaned_baseball_data.csv --angle-min -10 --angle-max 40 --outcome HomeRun"
)]
struct Args {
    /// Path to the cleaned batted-ball CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for dashboard.json and dashboard.html
    #[arg(short, long, default_value = "dashboard")]
    output_dir: PathBuf,

    /// Lowest launch angle of the outcome mix, inclusive
    #[arg(long, default_value = "-50", allow_hyphen_values = true)]
    angle_min: i64,

    /// Highest launch angle of the outcome mix, inclusive
    #[arg(long, default_value = "50", allow_hyphen_values = true)]
    angle_max: i64,

    /// Outcome to drill into (default: first outcome in the file)
    #[arg(long)]
    outcome: Option<String>,

    /// Batters and pitchers listed for the selected outcome
    #[arg(long, default_value = "10")]
    top: usize,

    /// Batters in the batting-average chart
    #[arg(long, default_value = "100")]
    top_batters: usize,

    /// Exit-speed histogram bins
    #[arg(long, default_value = "10")]
    bins: usize,

    /// Print the dashboard as JSON to stdout instead of writing files
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<DashboardConfig> {
    let mut builder = DashboardConfig::builder()
        .angle_window(args.angle_min, args.angle_max)
        .top_n(args.top)
        .top_batters(args.top_batters)
        .histogram_bins(args.bins)
        .output_dir(&args.output_dir);
    if let Some(outcome) = &args.outcome {
        builder = builder.outcome(outcome);
    }
    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    info!("Loading cleaned data from: {}", args.input.display());
    let dashboard = Dashboard::from_path(&args.input, &config)
        .with_context(|| format!("Building dashboard for {} failed", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let files = write_dashboard(&dashboard, &config.output_dir)?;
    print_summary(&dashboard);
    println!("HTML: {}", files.html.display());
    println!("JSON: {}", files.json.display());

    Ok(())
}

fn print_summary(dashboard: &Dashboard) {
    let overall = &dashboard.overall;

    println!();
    println!("{}", "=".repeat(60));
    println!("DASHBOARD ({} rows)", dashboard.rows);
    println!("{}", "=".repeat(60));
    println!(
        "  Batting average: {:.3}  Slugging: {:.3}",
        overall.line.batting_average, overall.slugging
    );
    println!(
        "  Hits: {} / {} at-bats  Home runs: {}",
        overall.line.hits, overall.line.at_bats, overall.line.home_runs
    );
    println!(
        "  Distance: {:.1} ft average, {:.1} ft max",
        overall.average_distance, overall.max_distance
    );
    println!("  Batters: {}  Pitchers: {}", overall.batters, overall.pitchers);

    let mix = &dashboard.outcome_mix;
    println!();
    println!("Outcomes with launch angle in [{}, {}] ({} rows):", mix.low, mix.high, mix.rows);
    for share in &mix.shares {
        println!("  {:<14} {:>5} {:>7.2}%", share.outcome, share.count, share.percentage);
    }

    if let Some(focus) = &dashboard.outcome_focus {
        println!();
        println!(
            "{}: {} rows, average exit speed {:.2} mph",
            focus.outcome, focus.rows, focus.average_exit_speed
        );
    }
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["diamond-dashboard", "-i", "cleaned.csv"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.angle_window, (-50, 50));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.top_batters, 100);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.outcome, None);
        assert_eq!(config.output_dir, PathBuf::from("dashboard"));
    }

    #[test]
    fn test_negative_window() {
        let args = Args::parse_from([
            "diamond-dashboard",
            "-i",
            "cleaned.csv",
            "--angle-min",
            "-20",
            "--angle-max",
            "-5",
            "--outcome",
            "Single",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.angle_window, (-20, -5));
        assert_eq!(config.outcome.as_deref(), Some("Single"));
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let args = Args::parse_from([
            "diamond-dashboard",
            "-i",
            "cleaned.csv",
            "--angle-min",
            "40",
            "--angle-max",
            "10",
        ]);
        assert!(build_config(&args).is_err());
    }
}
