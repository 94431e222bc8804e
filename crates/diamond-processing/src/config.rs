//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::schema::{IMPUTED_COLUMNS, OUTLIER_COLUMNS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the cleaned output file.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_baseball_data.csv";

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use diamond_processing::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .output_path("out/cleaned.csv")
///     .iqr_multiplier(1.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Where the cleaned CSV is written.
    /// Default: "cleaned_baseball_data.csv"
    pub output_path: PathBuf,

    /// Whether to remove exact duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Columns whose missing values are replaced by the column mean.
    /// Default: HANG_TIME, HIT_SPIN_RATE
    pub imputed_columns: Vec<String>,

    /// Columns checked for IQR outliers, in report order.
    /// Default: EXIT_SPEED, LAUNCH_ANGLE, HIT_DISTANCE, HANG_TIME, HIT_SPIN_RATE
    pub outlier_columns: Vec<String>,

    /// Width of the IQR fence.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Physically plausible launch angle range in degrees; values outside are flagged.
    /// Default: (-90.0, 90.0)
    pub launch_angle_range: (f64, f64),

    /// Whether to write the cleaned data to `output_path`.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_NAME),
            remove_duplicates: true,
            imputed_columns: IMPUTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            outlier_columns: OUTLIER_COLUMNS.iter().map(|c| c.to_string()).collect(),
            iqr_multiplier: 1.5,
            launch_angle_range: (-90.0, 90.0),
            save_to_disk: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        let (low, high) = self.launch_angle_range;
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(ConfigValidationError::InvalidRange { low, high });
        }

        if self.save_to_disk && self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyOutputPath);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a finite, non-negative number)")]
    InvalidMultiplier(f64),

    #[error("Invalid launch angle range: [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    #[error("Output path must not be empty")]
    EmptyOutputPath,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    output_path: Option<PathBuf>,
    remove_duplicates: Option<bool>,
    imputed_columns: Option<Vec<String>>,
    outlier_columns: Option<Vec<String>>,
    iqr_multiplier: Option<f64>,
    launch_angle_range: Option<(f64, f64)>,
    save_to_disk: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Set the path of the cleaned output file.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Override the mean-imputed columns.
    pub fn imputed_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imputed_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Override the columns checked for outliers.
    pub fn outlier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outlier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the IQR fence multiplier.
    ///
    /// # Arguments
    /// * `multiplier` - Non-negative factor applied to the IQR (e.g., 1.5)
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the plausible launch angle range (inclusive).
    pub fn launch_angle_range(mut self, low: f64, high: f64) -> Self {
        self.launch_angle_range = Some((low, high));
        self
    }

    /// Enable or disable writing the cleaned output.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            output_path: self.output_path.unwrap_or(defaults.output_path),
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            imputed_columns: self.imputed_columns.unwrap_or(defaults.imputed_columns),
            outlier_columns: self.outlier_columns.unwrap_or(defaults.outlier_columns),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            launch_angle_range: self
                .launch_angle_range
                .unwrap_or(defaults.launch_angle_range),
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.output_path, PathBuf::from("cleaned_baseball_data.csv"));
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.launch_angle_range, (-90.0, 90.0));
        assert_eq!(config.imputed_columns, vec!["HANG_TIME", "HIT_SPIN_RATE"]);
        assert_eq!(config.outlier_columns.len(), 5);
        assert!(config.remove_duplicates);
        assert!(config.save_to_disk);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .output_path("out/clean.csv")
            .iqr_multiplier(3.0)
            .launch_angle_range(-80.0, 80.0)
            .imputed_columns(["HANG_TIME"])
            .remove_duplicates(false)
            .save_to_disk(false)
            .build()
            .unwrap();

        assert_eq!(config.output_path, PathBuf::from("out/clean.csv"));
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.launch_angle_range, (-80.0, 80.0));
        assert_eq!(config.imputed_columns, vec!["HANG_TIME"]);
        assert!(!config.remove_duplicates);
        assert!(!config.save_to_disk);
    }

    #[test]
    fn test_validation_negative_multiplier() {
        let result = CleaningConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_inverted_range() {
        let result = CleaningConfig::builder()
            .launch_angle_range(10.0, -10.0)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_validation_empty_output_path() {
        let result = CleaningConfig::builder().output_path("").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyOutputPath
        ));

        // In-memory runs do not need a path.
        assert!(
            CleaningConfig::builder()
                .output_path("")
                .save_to_disk(false)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_path": "custom/cleaned.csv",
            "remove_duplicates": true,
            "imputed_columns": ["HANG_TIME"],
            "outlier_columns": ["EXIT_SPEED"],
            "iqr_multiplier": 2.0,
            "launch_angle_range": [-85.0, 85.0],
            "save_to_disk": false
        }"#;

        let config: CleaningConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.output_path.to_str().unwrap(), "custom/cleaned.csv");
        assert_eq!(config.outlier_columns, vec!["EXIT_SPEED"]);
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.launch_angle_range, (-85.0, 85.0));
        assert!(config.validate().is_ok());
    }
}
