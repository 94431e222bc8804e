use crate::pipeline::CleaningStage;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Profiling Types
// ============================================================================

/// Null count and dtype of one column at a point in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    /// Coarse dtype bucket ("numeric", "string", "datetime", ...).
    pub category: String,
    pub null_count: usize,
    pub null_percentage: f64,
}

/// Descriptive statistics of a numeric column.
///
/// Mirrors the usual `describe()` table: `std` is the sample standard deviation
/// and quartiles use linear interpolation between closest ranks. Statistics of
/// an empty column are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// What the reporter sees at each fixed point of the cleaning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub stage: CleaningStage,
    pub rows: usize,
    pub columns: usize,
    pub column_profiles: Vec<ColumnProfile>,
    pub numeric_stats: Vec<ColumnStats>,
}

impl StageSnapshot {
    /// Nulls across every column.
    pub fn total_nulls(&self) -> usize {
        self.column_profiles.iter().map(|c| c.null_count).sum()
    }

    /// Null count of one column, if present.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.column_profiles
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.null_count)
    }
}

// ============================================================================
// Cleaning Reports
// ============================================================================

/// A subset of rows rendered as text, with their positions in the table they
/// were taken from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowTable {
    pub columns: Vec<String>,
    pub row_indices: Vec<usize>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows that take part in a duplicate group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Every row that has at least one identical twin (all occurrences).
    pub count: usize,
    /// Rows that deduplication drops (all but the first of each group).
    pub redundant: usize,
    /// Full contents of the duplicated rows, in original order.
    pub rows: RowTable,
}

/// IQR outlier flags for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Positions of flagged rows in the cleaned table.
    pub row_indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl OutlierReport {
    pub fn outlier_count(&self) -> usize {
        self.row_indices.len()
    }
}

/// Launch angles outside the physically plausible range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchAngleFlags {
    pub low: f64,
    pub high: f64,
    pub rows: RowTable,
}

/// Mean imputation applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub values_filled: usize,
    pub fill_value: f64,
}

// ============================================================================
// Cleaning Summary
// ============================================================================

/// Types of actions taken during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// Date values were truncated to calendar dates.
    DatesNormalized,
    /// Missing values were imputed.
    ValueImputed,
    /// Values were flagged as outliers (kept in place).
    OutliersFlagged,
    /// Cleaned data was written to disk.
    OutputWritten,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::DatesNormalized => "Dates Normalized",
            Self::ValueImputed => "Value Imputed",
            Self::OutliersFlagged => "Outliers Flagged",
            Self::OutputWritten => "Output Written",
        }
    }
}

/// A single action taken during cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name or "dataset".
    pub target: String,
    pub description: String,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Counts describing what the pass did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub duplicates_removed: usize,
    pub imputations: Vec<ImputationRecord>,
    pub actions: Vec<CleaningAction>,
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Total number of cells filled by imputation.
    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|i| i.values_filled).sum()
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Everything the cleaning pass produced.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    /// The cleaned record set.
    pub data: DataFrame,
    /// Where the cleaned data was written, if it was.
    pub output_path: Option<PathBuf>,
    pub summary: CleaningSummary,
    /// Duplicates found before removal.
    pub duplicates: DuplicateReport,
    /// Duplicate count measured again after removal.
    pub duplicates_after: usize,
    pub unusual_launch_angles: LaunchAngleFlags,
    pub outliers: Vec<OutlierReport>,
    pub snapshots: Vec<StageSnapshot>,
}
