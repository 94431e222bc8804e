//! Batted-Ball Cleaning Library
//!
//! Loads a spreadsheet of batted-ball events, removes duplicate rows, fills
//! missing measurements and flags anomalous values, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Loading**: CSV input with typed measurement columns and required-column checks
//! - **Cleaning**: Exact duplicate removal and calendar-date normalization
//! - **Imputation**: Column-mean fill for hang time and hit spin rate
//! - **Outliers**: Per-column IQR flags and implausible launch angles (never removed)
//! - **Reporting**: Row/column counts, null counts, dtypes and descriptive
//!   statistics at every stage, plus a serializable report of the pass
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use diamond_processing::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .output_path("cleaned_baseball_data.csv")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .run("batted_balls.csv")?;
//!
//! println!("{} rows written", result.data.height());
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, normalize_dates, parse_calendar_date};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_OUTPUT_NAME};
pub use error::{CleaningError, Result as ProcessingResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{coerce_numeric, load_csv, load_events, validate_columns};
pub use pipeline::{
    ClosureProgressReporter, CleaningStage, OutlierHandler, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use reporting::{CleaningReport, ReportGenerator};
pub use schema::PlayOutcome;
pub use types::{
    ActionType, CleaningAction, CleaningResult, CleaningSummary, ColumnProfile, ColumnStats,
    DuplicateReport, ImputationRecord, LaunchAngleFlags, OutlierReport, RowTable, StageSnapshot,
};
pub use utils::{DtypeCategory, dtype_category_str, get_dtype_category, is_numeric_dtype};
