//! Validation summary models.
//!
//! Summaries carry counts and ratios only, never actual row values, so they
//! are safe to print or ship to a dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse dataset quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    /// No missing values, no duplicates, and nearly all emails valid
    Excellent,
    /// Most emails valid
    Good,
    /// Everything else, including an empty dataset
    Poor,
}

impl QualityTier {
    /// Classifies a dataset from its summary counts.
    ///
    /// Only the email percentage separates Good from Poor; missing values
    /// and duplicates only block Excellent.
    pub fn classify(
        missing_values: u64,
        duplicate_rows: u64,
        valid_email_percentage: f64,
        excellent_min_email_pct: f64,
        good_min_email_pct: f64,
    ) -> Self {
        if missing_values == 0
            && duplicate_rows == 0
            && valid_email_percentage >= excellent_min_email_pct
        {
            QualityTier::Excellent
        } else if valid_email_percentage >= good_min_email_pct {
            QualityTier::Good
        } else {
            QualityTier::Poor
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::Excellent => write!(f, "Excellent"),
            QualityTier::Good => write!(f, "Good"),
            QualityTier::Poor => write!(f, "Poor"),
        }
    }
}

/// Missing-value metrics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCompleteness {
    /// Column name
    pub column_name: String,
    /// Count of null, empty or absent values
    pub missing_count: u64,
    /// Completeness ratio (0.0-1.0)
    pub completeness: f64,
}

impl ColumnCompleteness {
    /// Creates new column completeness metrics.
    pub fn new(column_name: impl Into<String>, missing_count: u64, total: u64) -> Self {
        let column_name = column_name.into();

        if missing_count > total {
            tracing::warn!(
                "Quality metrics anomaly: missing_count ({}) exceeds total ({}) for column '{}'",
                missing_count,
                total,
                column_name
            );
        }

        let completeness = if total == 0 {
            1.0
        } else {
            total.saturating_sub(missing_count) as f64 / total as f64
        };

        Self {
            column_name,
            missing_count,
            completeness: completeness.clamp(0.0, 1.0),
        }
    }
}

/// Missing-value metrics for a whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessMetrics {
    /// Total missing cells across all rows and columns
    pub total_missing: u64,
    /// Per-column breakdown, in column order
    pub column_metrics: Vec<ColumnCompleteness>,
}

/// Quality report computed fresh from a dataset.
///
/// Read-only: a new dataset load produces a new summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Number of rows analyzed
    pub total_rows: u64,
    /// Null, empty-string and absent cells, summed across all cells
    pub missing_values: u64,
    /// Extra copies of rows already seen earlier in the dataset
    pub duplicate_rows: u64,
    /// Rows whose email column holds a well-shaped address
    pub valid_email_count: u64,
    /// `valid_email_count / total_rows * 100`, one decimal place
    pub valid_email_percentage: f64,
    /// Derived quality tier
    pub quality_tier: QualityTier,
    /// Per-column missing-value breakdown
    pub column_completeness: Vec<ColumnCompleteness>,
    /// Timestamp when the summary was computed
    pub analyzed_at: DateTime<Utc>,
}

impl ValidationSummary {
    /// Valid-email percentage formatted with exactly one decimal.
    pub fn valid_email_display(&self) -> String {
        format!("{:.1}", self.valid_email_percentage)
    }
}
