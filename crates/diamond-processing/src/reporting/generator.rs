use crate::error::{CleaningError, Result};
use crate::pipeline::CleaningStage;
use crate::types::{
    CleaningAction, CleaningResult, CleaningSummary, OutlierReport, RowTable, StageSnapshot,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Serializable account of one cleaning pass.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output (if written)
    pub output_file: Option<String>,

    /// Counts describing what the pass did
    pub summary: CleaningSummary,

    /// Duplicate rows found before removal
    pub duplicates: DuplicateSection,

    /// Launch angles outside the plausible range
    pub unusual_launch_angles: LaunchAngleSection,

    /// Per-column IQR outlier flags, in detection order
    pub outliers: Vec<OutlierReport>,

    /// Reporter snapshots at each fixed point
    pub snapshots: Vec<StageSnapshot>,

    /// Actions in the order they were taken
    pub actions: Vec<CleaningAction>,
}

/// Duplicate section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateSection {
    /// Rows taking part in a duplicate group, before removal
    pub count: usize,
    /// Rows dropped by removal
    pub redundant: usize,
    /// Duplicate count measured after removal
    pub count_after: usize,
    pub rows: Vec<RecordRow>,
}

/// Unusual launch angle section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchAngleSection {
    pub low: f64,
    pub high: f64,
    pub rows: Vec<RecordRow>,
}

/// One rendered row, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    /// Position of the row in the table it was taken from
    pub row: usize,
    pub values: BTreeMap<String, Option<String>>,
}

/// Turn a row table into one map per row.
pub fn record_rows(table: &RowTable) -> Vec<RecordRow> {
    table
        .row_indices
        .iter()
        .zip(&table.rows)
        .map(|(&row, cells)| RecordRow {
            row,
            values: table
                .columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        })
        .collect()
}

// ============================================================================
// Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the cleaned record set as CSV, replacing any previous output.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so `path` never holds a partial file.
    pub fn write_cleaned_csv(df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| CleaningError::InvalidConfig(format!("'{}' is not a file path", path.display())))?;
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        let written = File::create(&tmp_path)
            .map_err(CleaningError::from)
            .and_then(|mut file| {
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(b',')
                    .with_quote_char(b'"')
                    .finish(df)?;
                file.flush()?;
                Ok(())
            });

        if let Err(e) = written {
            // Best effort; the original error is what matters.
            let _ = fs::remove_file(&tmp_path);
            return Err(e.with_context(format!("writing {}", path.display())));
        }

        fs::rename(&tmp_path, path)?;
        info!("Dataset saved: {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Build the report for a finished pass.
    pub fn build_report(input_file: &str, result: &CleaningResult) -> CleaningReport {
        debug!(
            "Building report with {} snapshots and {} actions",
            result.snapshots.len(),
            result.summary.actions.len()
        );

        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: result
                .output_path
                .as_ref()
                .map(|p| p.display().to_string()),
            summary: result.summary.clone(),
            duplicates: DuplicateSection {
                count: result.duplicates.count,
                redundant: result.duplicates.redundant,
                count_after: result.duplicates_after,
                rows: record_rows(&result.duplicates.rows),
            },
            unusual_launch_angles: LaunchAngleSection {
                low: result.unusual_launch_angles.low,
                high: result.unusual_launch_angles.high,
                rows: record_rows(&result.unusual_launch_angles.rows),
            },
            outliers: result.outliers.clone(),
            snapshots: result.snapshots.clone(),
            actions: result.summary.actions.clone(),
        }
    }

    /// Write a report to `<base_name>_report.json` in the output directory.
    pub fn write_report_to_file(&self, report: &CleaningReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

impl CleaningReport {
    /// Snapshot taken at `stage`, if the pass reached it.
    pub fn snapshot(&self, stage: CleaningStage) -> Option<&StageSnapshot> {
        self.snapshots.iter().find(|s| s.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DuplicateReport, LaunchAngleFlags};
    use pretty_assertions::assert_eq;

    fn sample_table() -> RowTable {
        RowTable {
            columns: vec!["BATTER".to_string(), "HANG_TIME".to_string()],
            row_indices: vec![0, 3],
            rows: vec![
                vec![Some("Acuna".to_string()), Some("4.5".to_string())],
                vec![Some("Acuna".to_string()), None],
            ],
        }
    }

    fn sample_result() -> CleaningResult {
        CleaningResult {
            data: df!("BATTER" => &["Acuna"]).unwrap(),
            output_path: Some(PathBuf::from("out/cleaned.csv")),
            summary: CleaningSummary::new(),
            duplicates: DuplicateReport {
                count: 2,
                redundant: 1,
                rows: sample_table(),
            },
            duplicates_after: 0,
            unusual_launch_angles: LaunchAngleFlags {
                low: -90.0,
                high: 90.0,
                rows: RowTable::default(),
            },
            outliers: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    #[test]
    fn test_record_rows() {
        let rows = record_rows(&sample_table());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row, 3);
        assert_eq!(rows[0].values.get("BATTER"), Some(&Some("Acuna".to_string())));
        assert_eq!(rows[1].values.get("HANG_TIME"), Some(&None));
    }

    #[test]
    fn test_build_report() {
        let report = ReportGenerator::build_report("data/events.csv", &sample_result());

        assert_eq!(report.input_file, "data/events.csv");
        assert_eq!(report.output_file.as_deref(), Some("out/cleaned.csv"));
        assert_eq!(report.duplicates.count, 2);
        assert_eq!(report.duplicates.count_after, 0);
        assert_eq!(report.duplicates.rows.len(), 2);
        assert!(report.snapshot(CleaningStage::Loaded).is_none());
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let report = ReportGenerator::build_report("events.csv", &sample_result());

        let path = generator.write_report_to_file(&report, "events").unwrap();

        assert_eq!(path, dir.path().join("events_report.json"));
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["duplicates"]["count"], 2);
    }

    #[test]
    fn test_write_cleaned_csv_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cleaned.csv");
        let mut df = df!(
            "BATTER" => &["Acuna", "Riley"],
            "HANG_TIME" => &[4.5, 3.0]
        )
        .unwrap();

        ReportGenerator::write_cleaned_csv(&mut df, &path).unwrap();
        let mut smaller = df.head(Some(1));
        ReportGenerator::write_cleaned_csv(&mut smaller, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "BATTER,HANG_TIME");
        assert_eq!(lines.len(), 2);
        assert!(!dir.path().join("nested").join(".cleaned.csv.tmp").exists());
    }
}
