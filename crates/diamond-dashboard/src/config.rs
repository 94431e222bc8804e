//! Dashboard filters and output settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for building a dashboard.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Inclusive launch-angle window for the outcome mix, in degrees.
    /// Default: (-50, 50)
    pub angle_window: (i64, i64),

    /// Outcome to focus on. `None` picks the first outcome in file order.
    pub outcome: Option<String>,

    /// Number of batters and pitchers listed for the focused outcome.
    /// Default: 10
    pub top_n: usize,

    /// Number of batters in the batting-average chart.
    /// Default: 100
    pub top_batters: usize,

    /// Exit-speed histogram bin count.
    /// Default: 10
    pub histogram_bins: usize,

    /// Directory receiving dashboard.json and dashboard.html.
    /// Default: "dashboard"
    pub output_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            angle_window: (-50, 50),
            outcome: None,
            top_n: 10,
            top_batters: 100,
            histogram_bins: 10,
            output_dir: PathBuf::from("dashboard"),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let (low, high) = self.angle_window;
        if low > high {
            return Err(ConfigValidationError::InvalidWindow { low, high });
        }
        if self.top_n == 0 || self.top_batters == 0 {
            return Err(ConfigValidationError::ZeroLimit);
        }
        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroBins);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid launch angle window: [{low}, {high}]")]
    InvalidWindow { low: i64, high: i64 },

    #[error("Top-N limits must be at least 1")]
    ZeroLimit,

    #[error("Histogram needs at least one bin")]
    ZeroBins,
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    angle_window: Option<(i64, i64)>,
    outcome: Option<String>,
    top_n: Option<usize>,
    top_batters: Option<usize>,
    histogram_bins: Option<usize>,
    output_dir: Option<PathBuf>,
}

impl DashboardConfigBuilder {
    /// Set the inclusive launch-angle window.
    pub fn angle_window(mut self, low: i64, high: i64) -> Self {
        self.angle_window = Some((low, high));
        self
    }

    /// Focus on a specific outcome label.
    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn top_batters(mut self, n: usize) -> Self {
        self.top_batters = Some(n);
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            angle_window: self.angle_window.unwrap_or(defaults.angle_window),
            outcome: self.outcome.or(defaults.outcome),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            top_batters: self.top_batters.unwrap_or(defaults.top_batters),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.angle_window, (-50, 50));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.top_batters, 100);
    }

    #[test]
    fn test_builder() {
        let config = DashboardConfig::builder()
            .angle_window(0, 35)
            .outcome("HomeRun")
            .histogram_bins(20)
            .build()
            .unwrap();

        assert_eq!(config.angle_window, (0, 35));
        assert_eq!(config.outcome.as_deref(), Some("HomeRun"));
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = DashboardConfig::builder().angle_window(10, -10).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidWindow { low: 10, high: -10 })
        ));
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(DashboardConfig::builder().top_n(0).build().is_err());
        assert!(DashboardConfig::builder().histogram_bins(0).build().is_err());
    }
}
