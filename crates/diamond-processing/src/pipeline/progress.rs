//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline hands a [`ProgressUpdate`] to an optional [`ProgressReporter`]
//! at every fixed point of the pass. Updates at a fixed point carry the
//! reporter's [`StageSnapshot`] of the data.
//!
//! # Example
//!
//! ```rust,ignore
//! use diamond_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .process(df);
//! ```

use crate::types::StageSnapshot;
use serde::{Deserialize, Serialize};

/// Fixed points of the cleaning pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Raw data loaded and typed
    Loaded,
    /// Exact duplicate rows removed
    Deduplicated,
    /// Game dates truncated to calendar dates
    DatesNormalized,
    /// Missing measurements filled with column means
    Imputed,
    /// Outlier flags computed (data unchanged)
    OutliersDetected,
    /// Cleaned data written to disk
    Written,
}

impl CleaningStage {
    /// All stages in execution order.
    pub const ALL: [CleaningStage; 6] = [
        Self::Loaded,
        Self::Deduplicated,
        Self::DatesNormalized,
        Self::Imputed,
        Self::OutliersDetected,
        Self::Written,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loaded => "Loaded",
            Self::Deduplicated => "Duplicates Removed",
            Self::DatesNormalized => "Dates Normalized",
            Self::Imputed => "Missing Values Imputed",
            Self::OutliersDetected => "Outliers Detected",
            Self::Written => "Output Written",
        }
    }

    /// Fraction of the pass complete once this stage is reached (0.0 - 1.0).
    pub fn progress(&self) -> f32 {
        let position = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        (position + 1) as f32 / Self::ALL.len() as f32
    }
}

/// Progress update emitted at a fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage just reached
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing what happened
    pub message: String,

    /// Reporter view of the data at this stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<StageSnapshot>,
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl ProgressUpdate {
    /// Creates a progress update without a snapshot.
    pub fn new(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: message.into(),
            snapshot: None,
        }
    }

    /// Creates a progress update carrying the stage snapshot.
    pub fn with_snapshot(snapshot: StageSnapshot, message: impl Into<String>) -> Self {
        Self {
            stage: snapshot.stage,
            progress: snapshot.stage.progress(),
            message: message.into(),
            snapshot: Some(snapshot),
        }
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implement this trait to observe the pass; implementations must not modify
/// the data they are shown.
pub trait ProgressReporter: Send + Sync {
    /// Called once per fixed point.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_snapshot(stage: CleaningStage) -> StageSnapshot {
        StageSnapshot {
            stage,
            rows: 0,
            columns: 0,
            column_profiles: Vec::new(),
            numeric_stats: Vec::new(),
        }
    }

    #[test]
    fn test_stage_progress_is_monotonic() {
        let progress: Vec<f32> = CleaningStage::ALL.iter().map(|s| s.progress()).collect();
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(CleaningStage::Written.progress(), 1.0);
    }

    #[test]
    fn test_stage_display_name() {
        assert_eq!(CleaningStage::Imputed.display_name(), "Missing Values Imputed");
        assert_eq!(CleaningStage::Written.display_name(), "Output Written");
    }

    #[test]
    fn test_progress_update_with_snapshot() {
        let update = ProgressUpdate::with_snapshot(
            empty_snapshot(CleaningStage::Deduplicated),
            "Removed 1 duplicate",
        );
        assert_eq!(update.stage, CleaningStage::Deduplicated);
        assert!(update.snapshot.is_some());
        assert_eq!(update.message, "Removed 1 duplicate");
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(CleaningStage::Loaded, "Loaded"));
        reporter.report(ProgressUpdate::new(CleaningStage::Written, "Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_json_values() {
        let stage_expectations = [
            (CleaningStage::Loaded, "\"loaded\""),
            (CleaningStage::Deduplicated, "\"deduplicated\""),
            (CleaningStage::DatesNormalized, "\"dates_normalized\""),
            (CleaningStage::Imputed, "\"imputed\""),
            (CleaningStage::OutliersDetected, "\"outliers_detected\""),
            (CleaningStage::Written, "\"written\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, expected_json);
        }
    }

    #[test]
    fn test_update_without_snapshot_omits_field() {
        let json = serde_json::to_string(&ProgressUpdate::new(CleaningStage::Loaded, "x")).unwrap();
        assert!(!json.contains("snapshot"));
    }
}
