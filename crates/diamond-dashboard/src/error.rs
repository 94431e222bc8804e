//! Error types for the dashboard.

use crate::config::ConfigValidationError;
use diamond_processing::CleaningError;
use thiserror::Error;

/// The main error type for building and writing a dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Loading the cleaned file failed.
    #[error(transparent)]
    Processing(#[from] CleaningError),

    /// A filter does not select a valid subset.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Processing(e) => e.error_code(),
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

impl From<ConfigValidationError> for DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        Self::InvalidFilter(err.to_string())
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DashboardError::InvalidFilter("window".to_string());
        assert_eq!(err.error_code(), "INVALID_FILTER");

        let err: DashboardError = CleaningError::ColumnNotFound("BATTER".to_string()).into();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(err.to_string(), "Column 'BATTER' not found in dataset");
    }

    #[test]
    fn test_config_error_becomes_invalid_filter() {
        let err: DashboardError = ConfigValidationError::InvalidWindow { low: 10, high: -10 }.into();
        assert!(matches!(err, DashboardError::InvalidFilter(_)));
    }
}
