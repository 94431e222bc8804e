//! Pipeline module.
//!
//! This module provides the cleaning pipeline and related components.

mod builder;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use outliers::OutlierHandler;
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
