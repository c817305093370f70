//! Validation configuration.
//!
//! Holds the quality-tier thresholds, the name of the email column and the
//! preview size. Defaults reproduce the dashboard's behavior exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the column checked for email validity.
pub const DEFAULT_EMAIL_COLUMN: &str = "email";

/// Default number of rows shown in a dataset preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Validation summarizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Column whose values are checked against the email pattern
    pub email_column: String,
    /// Minimum valid-email percentage for the Excellent tier (0-100)
    pub excellent_min_email_pct: f64,
    /// Minimum valid-email percentage for the Good tier (0-100)
    pub good_min_email_pct: f64,
    /// Number of rows in a dataset preview
    pub preview_rows: usize,
}

/// Validation errors for [`ValidationConfig`].
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("excellent_min_email_pct must be between 0 and 100, got {0}")]
    InvalidExcellentThreshold(f64),
    #[error("good_min_email_pct must be between 0 and 100, got {0}")]
    InvalidGoodThreshold(f64),
    #[error("good_min_email_pct ({good}) must not exceed excellent_min_email_pct ({excellent})")]
    InvertedThresholds { good: f64, excellent: f64 },
    #[error("email_column must not be empty")]
    EmptyEmailColumn,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
            excellent_min_email_pct: 95.0,
            good_min_email_pct: 80.0,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

fn clamp_percentage(name: &str, value: f64) -> f64 {
    if !(0.0..=100.0).contains(&value) {
        tracing::warn!("{} {} clamped to valid range [0, 100]", name, value);
    }
    value.clamp(0.0, 100.0)
}

impl ValidationConfig {
    /// Creates a new validation config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the email column name.
    pub fn with_email_column(mut self, column: impl Into<String>) -> Self {
        self.email_column = column.into();
        self
    }

    /// Builder method to set the Excellent tier threshold.
    pub fn with_excellent_min_email_pct(mut self, threshold: f64) -> Self {
        self.excellent_min_email_pct = clamp_percentage("excellent_min_email_pct", threshold);
        self
    }

    /// Builder method to set the Good tier threshold.
    pub fn with_good_min_email_pct(mut self, threshold: f64) -> Self {
        self.good_min_email_pct = clamp_percentage("good_min_email_pct", threshold);
        self
    }

    /// Builder method to set the preview size.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.excellent_min_email_pct) {
            return Err(ConfigValidationError::InvalidExcellentThreshold(
                self.excellent_min_email_pct,
            ));
        }
        if !(0.0..=100.0).contains(&self.good_min_email_pct) {
            return Err(ConfigValidationError::InvalidGoodThreshold(
                self.good_min_email_pct,
            ));
        }
        if self.good_min_email_pct > self.excellent_min_email_pct {
            return Err(ConfigValidationError::InvertedThresholds {
                good: self.good_min_email_pct,
                excellent: self.excellent_min_email_pct,
            });
        }
        if self.email_column.is_empty() {
            return Err(ConfigValidationError::EmptyEmailColumn);
        }
        Ok(())
    }
}
