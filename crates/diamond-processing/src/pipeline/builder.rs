//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning pass.

use crate::cleaner::{DataCleaner, normalize_dates};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::loader::load_events;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::reporting::ReportGenerator;
use crate::schema::GAME_DATE;
use crate::types::{ActionType, CleaningAction, CleaningResult, CleaningSummary, StageSnapshot};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// The main cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use diamond_processing::{CleaningConfig, Pipeline};
///
/// let result = Pipeline::builder()
///     .config(CleaningConfig::builder().output_path("out/cleaned.csv").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run("data/batted_balls.csv")?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Pipeline must stay Send.
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Load `path` and clean it.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<CleaningResult> {
        let df = load_events(path)?;
        self.process(df)
    }

    /// Clean an already loaded record set.
    ///
    /// The input must carry the typed measurement columns produced by the
    /// loader. Every failure aborts the pass.
    pub fn process(&self, df: DataFrame) -> Result<CleaningResult> {
        self.process_internal(df).inspect_err(|e| {
            error!("Pipeline error: {}", e);
        })
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    /// Snapshot the data at a fixed point and hand it to the reporter.
    fn checkpoint(
        &self,
        df: &DataFrame,
        stage: CleaningStage,
        message: String,
        snapshots: &mut Vec<StageSnapshot>,
    ) -> Result<()> {
        let snapshot = DataProfiler::snapshot(df, stage)?;
        info!(
            "[{}] {} rows x {} columns, {} nulls: {}",
            stage.display_name(),
            snapshot.rows,
            snapshot.columns,
            snapshot.total_nulls(),
            message
        );
        snapshots.push(snapshot.clone());
        self.report_progress(ProgressUpdate::with_snapshot(snapshot, message));
        Ok(())
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();
        let config = &self.config;

        info!("Starting cleaning pipeline...");

        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();
        let mut snapshots = Vec::with_capacity(CleaningStage::ALL.len());

        self.checkpoint(
            &df,
            CleaningStage::Loaded,
            format!("Loaded {} rows", df.height()),
            &mut snapshots,
        )?;

        // Step 1: Duplicates
        let duplicates = DataCleaner::find_duplicates(&df)?;
        let mut df = if config.remove_duplicates {
            let (deduplicated, removed) = DataCleaner::deduplicate(df)?;
            summary.duplicates_removed = removed;
            if removed > 0 {
                summary.add_action(CleaningAction::new(
                    ActionType::DuplicatesRemoved,
                    "dataset",
                    format!("Removed {} duplicate rows", removed),
                ));
            }
            deduplicated
        } else {
            if duplicates.count > 0 {
                summary.add_warning(format!(
                    "{} duplicate rows kept (removal disabled)",
                    duplicates.redundant
                ));
            }
            df
        };
        let duplicates_after = DataCleaner::find_duplicates(&df)?.count;
        self.checkpoint(
            &df,
            CleaningStage::Deduplicated,
            format!(
                "{} duplicate rows before, {} after",
                duplicates.count, duplicates_after
            ),
            &mut snapshots,
        )?;

        // Step 2: Calendar dates
        let normalized = normalize_dates(&mut df, GAME_DATE)?;
        summary.add_action(CleaningAction::new(
            ActionType::DatesNormalized,
            GAME_DATE,
            format!("Truncated {} values to calendar dates", normalized),
        ));
        self.checkpoint(
            &df,
            CleaningStage::DatesNormalized,
            format!("Normalized {} dates", normalized),
            &mut snapshots,
        )?;

        // Step 3: Physically implausible launch angles are flagged, not removed
        let (angle_low, angle_high) = config.launch_angle_range;
        let unusual_launch_angles = OutlierHandler::unusual_launch_angles(&df, angle_low, angle_high)?;
        if !unusual_launch_angles.rows.is_empty() {
            summary.add_warning(format!(
                "{} rows have a launch angle outside [{}, {}]",
                unusual_launch_angles.rows.len(),
                angle_low,
                angle_high
            ));
        }

        // Step 4: Mean imputation
        for column in &config.imputed_columns {
            let record = StatisticalImputer::apply_numeric_mean(&mut df, column)
                .context(format!("Imputing '{}'", column))?;
            if record.values_filled > 0 {
                summary.add_action(CleaningAction::new(
                    ActionType::ValueImputed,
                    column.as_str(),
                    format!(
                        "Filled {} missing values with mean {:.4}",
                        record.values_filled, record.fill_value
                    ),
                ));
            }
            summary.imputations.push(record);
        }
        self.checkpoint(
            &df,
            CleaningStage::Imputed,
            format!("Imputed {} values", summary.values_imputed()),
            &mut snapshots,
        )?;

        // Step 5: IQR outliers on the imputed data
        let outliers =
            OutlierHandler::detect_all(&df, &config.outlier_columns, config.iqr_multiplier)
                .context("Detecting IQR outliers")?;
        for report in outliers.iter().filter(|r| r.outlier_count() > 0) {
            summary.add_action(CleaningAction::new(
                ActionType::OutliersFlagged,
                report.column.as_str(),
                format!(
                    "Flagged {} values outside [{:.3}, {:.3}]",
                    report.outlier_count(),
                    report.lower_bound,
                    report.upper_bound
                ),
            ));
        }
        let flagged: usize = outliers.iter().map(|r| r.outlier_count()).sum();
        if flagged > 0 {
            warn!("{} outlier values flagged across {} columns", flagged, outliers.len());
        }
        self.checkpoint(
            &df,
            CleaningStage::OutliersDetected,
            format!("Flagged {} outlier values", flagged),
            &mut snapshots,
        )?;

        // Step 6: Output
        let output_path = if config.save_to_disk {
            let path = ReportGenerator::write_cleaned_csv(&mut df, &config.output_path)?;
            summary.add_action(CleaningAction::new(
                ActionType::OutputWritten,
                "dataset",
                format!("Wrote {} rows to {}", df.height(), path.display()),
            ));
            self.checkpoint(
                &df,
                CleaningStage::Written,
                format!("Wrote {}", path.display()),
                &mut snapshots,
            )?;
            Some(path)
        } else {
            info!("Skipping output (save_to_disk disabled)");
            None
        };

        // Finalize summary
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.rows_after = df.height();
        summary.columns_after = df.width();

        info!(
            "Cleaning complete: {} -> {} rows in {} ms",
            summary.rows_before, summary.rows_after, summary.duration_ms
        );

        Ok(CleaningResult {
            data: df,
            output_path,
            summary,
            duplicates,
            duplicates_after,
            unusual_launch_angles,
            outliers,
            snapshots,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
