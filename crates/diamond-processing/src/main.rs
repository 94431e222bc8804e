//! CLI entry point for the batted-ball cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use diamond_processing::{
    CleaningConfig, CleaningError, CleaningReport, DEFAULT_OUTPUT_NAME, Pipeline, ReportGenerator,
    StageSnapshot,
};
use diamond_processing::reporting::RecordRow;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Batted-ball data cleaning pipeline",
    long_about = "Removes duplicate rows, fills missing hang time and spin rate with \
                  column means, normalizes game dates and flags outliers.\n\n\
                  EXAMPLES:\n  \
                  # Clean into ./cleaned_baseball_data.csv\n  \
                  diamond-clean -i batted_balls.csv\n\n  \
                  # Write into a directory with a JSON report\n  \
                  diamond-clean -i batted_balls.csv --output-dir out/ --emit-report\n\n  \
                  # Preview without writing anything\n  \
                  diamond-clean -i batted_balls.csv --dry-run"
)]
struct Args {
    /// Path to the CSV export of the batted-ball spreadsheet
    #[arg(short, long)]
    input: PathBuf,

    /// Name or path of the cleaned CSV
    #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Directory for the cleaned CSV and report
    ///
    /// When set, `--output` is resolved relative to this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write a detailed JSON report next to the output
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Width of the IQR outlier fence
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Lowest plausible launch angle in degrees
    #[arg(long, default_value = "-90", allow_hyphen_values = true)]
    angle_min: f64,

    /// Highest plausible launch angle in degrees
    #[arg(long, default_value = "90", allow_hyphen_values = true)]
    angle_max: f64,

    /// Keep exact duplicate rows instead of removing them
    #[arg(long)]
    keep_duplicates: bool,

    /// Run the pass in memory and report without writing the cleaned file
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn output_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(&self.output),
            None => self.output.clone(),
        }
    }

    fn report_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
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

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = CleaningConfig::builder()
        .output_path(args.output_path())
        .remove_duplicates(!args.keep_duplicates)
        .iqr_multiplier(args.iqr_multiplier)
        .launch_angle_range(args.angle_min, args.angle_max)
        .save_to_disk(!args.dry_run)
        .build()?;

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    info!("Loading dataset from: {}", args.input.display());
    let result = match pipeline.run(&args.input) {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            error!("Cleaning failed: {}", e);
            return Err(anyhow!(failure_message(&args.input, &e)));
        }
    };

    let input_file = args.input.display().to_string();
    let report = ReportGenerator::build_report(&input_file, &result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report && !args.dry_run {
        let generator = ReportGenerator::new(args.report_dir());
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &args);

    Ok(())
}

/// Operator-facing message for a failed pass. Input errors point at the file.
fn failure_message(input: &Path, err: &CleaningError) -> String {
    if err.is_input_error() {
        format!(
            "Cleaning {} failed [{}]: {}. Fix the input file and run again.",
            input.display(),
            err.error_code(),
            err
        )
    } else {
        format!("Cleaning {} failed [{}]: {}", input.display(), err.error_code(), err)
    }
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

/// Print the reporter's view of one stage.
fn print_snapshot(snapshot: &StageSnapshot) {
    println!(
        "{} ({} rows x {} columns)",
        snapshot.stage.display_name().to_uppercase(),
        snapshot.rows,
        snapshot.columns
    );
    println!("{}", "-".repeat(40));

    println!("{:<16} {:<10} {:>8}", "Column", "Type", "Nulls");
    for col in &snapshot.column_profiles {
        println!(
            "{:<16} {:<10} {:>8}",
            truncate_str(&col.name, 15),
            truncate_str(&col.dtype, 9),
            col.null_count
        );
    }
    println!();

    if !snapshot.numeric_stats.is_empty() {
        println!(
            "{:<16} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
            "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for stats in &snapshot.numeric_stats {
            println!(
                "{:<16} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
                truncate_str(&stats.column, 15),
                stats.count,
                fmt_stat(stats.mean),
                fmt_stat(stats.std),
                fmt_stat(stats.min),
                fmt_stat(stats.q1),
                fmt_stat(stats.median),
                fmt_stat(stats.q3),
                fmt_stat(stats.max)
            );
        }
        println!();
    }
}

fn print_rows(rows: &[RecordRow]) {
    for row in rows {
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|(column, value)| format!("{}={}", column, value.as_deref().unwrap_or("null")))
            .collect();
        println!("  [{}] {}", row.row, cells.join(", "));
    }
}

/// Print a human-readable summary of the cleaning pass.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &CleaningReport, args: &Args) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    if args.dry_run {
        println!("DRY RUN - nothing was written");
    } else {
        println!("CLEANING COMPLETE");
    }
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows_before, summary.columns_before
    );
    match &report.output_file {
        Some(output_file) => println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_after, summary.columns_after
        ),
        None => println!("Output: (not written)"),
    }
    println!();

    for snapshot in &report.snapshots {
        print_snapshot(snapshot);
    }

    println!("DUPLICATES");
    println!("{}", "-".repeat(40));
    println!(
        "  {} duplicated rows before removal ({} redundant), {} after",
        report.duplicates.count, report.duplicates.redundant, report.duplicates.count_after
    );
    print_rows(&report.duplicates.rows);
    println!();

    let angles = &report.unusual_launch_angles;
    println!("UNUSUAL LAUNCH ANGLES (outside [{}, {}])", angles.low, angles.high);
    println!("{}", "-".repeat(40));
    if angles.rows.is_empty() {
        println!("  None");
    } else {
        print_rows(&angles.rows);
    }
    println!();

    println!("OUTLIERS (IQR)");
    println!("{}", "-".repeat(40));
    for outliers in &report.outliers {
        println!(
            "  {:<16} bounds [{:.3}, {:.3}]  {} flagged",
            outliers.column,
            outliers.lower_bound,
            outliers.upper_bound,
            outliers.outlier_count()
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed()
    );
    for imputation in &summary.imputations {
        println!(
            "  {}: {} values filled with {:.4}",
            imputation.column, imputation.values_filled, imputation.fill_value
        );
    }
    println!();

    if !report.actions.is_empty() {
        println!("Actions Taken:");
        for action in &report.actions {
            println!("  - [{}] {}", action.action_type.display_name(), action.description);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    if !args.emit_report {
        println!("Use --emit-report to save detailed JSON report");
    }
    println!("{}", "=".repeat(80));
}
