//! Validation summarizer facade.
//!
//! `QualityAnalyzer` runs the completeness, uniqueness and email checks over
//! a dataset and folds them into a [`ValidationSummary`].

use chrono::Utc;

use crate::models::Dataset;

use super::completeness::analyze_completeness;
use super::config::ValidationConfig;
use super::email::count_valid_emails;
use super::models::{QualityTier, ValidationSummary};
use super::uniqueness::count_duplicate_rows;

/// Summarizes dataset quality.
///
/// # Example
///
/// ```rust
/// use leadcheck_core::ingest::sample_dataset;
/// use leadcheck_core::quality::{QualityAnalyzer, QualityTier};
///
/// let analyzer = QualityAnalyzer::with_defaults();
/// let summary = analyzer.summarize(&sample_dataset());
/// assert_eq!(summary.total_rows, 5);
/// assert_eq!(summary.quality_tier, QualityTier::Excellent);
/// ```
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    config: ValidationConfig,
}

impl QualityAnalyzer {
    /// Creates a new analyzer with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Creates a new analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Returns a reference to the analyzer configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Computes a full validation summary for a dataset.
    ///
    /// Never fails: rows with unexpected value types are counted as present
    /// and as non-matching emails.
    pub fn summarize(&self, dataset: &Dataset) -> ValidationSummary {
        let total_rows = dataset.rows.len() as u64;

        let completeness = analyze_completeness(dataset);
        let duplicate_rows = count_duplicate_rows(&dataset.rows);
        let valid_email_count = count_valid_emails(&dataset.rows, &self.config.email_column);
        let valid_email_percentage = email_percentage(valid_email_count, total_rows);

        let quality_tier = QualityTier::classify(
            completeness.total_missing,
            duplicate_rows,
            valid_email_percentage,
            self.config.excellent_min_email_pct,
            self.config.good_min_email_pct,
        );

        tracing::debug!(
            "Summarized {}: {} rows, {} missing, {} duplicates, {:.1}% valid emails ({})",
            dataset.source,
            total_rows,
            completeness.total_missing,
            duplicate_rows,
            valid_email_percentage,
            quality_tier
        );

        ValidationSummary {
            total_rows,
            missing_values: completeness.total_missing,
            duplicate_rows,
            valid_email_count,
            valid_email_percentage,
            quality_tier,
            column_completeness: completeness.column_metrics,
            analyzed_at: Utc::now(),
        }
    }
}

/// Summarizes a dataset with the default configuration.
pub fn summarize(dataset: &Dataset) -> ValidationSummary {
    QualityAnalyzer::with_defaults().summarize(dataset)
}

/// Percentage of `valid` over `total`, rounded to one decimal place.
///
/// An empty dataset yields 0.0.
fn email_percentage(valid: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = valid as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatasetSource, Row};
    use serde_json::json;

    fn dataset(values: Vec<serde_json::Value>) -> Dataset {
        let rows = values.into_iter().filter_map(Row::from_json).collect();
        Dataset::from_rows(rows, DatasetSource::Sample)
    }

    #[test]
    fn test_analyzer_with_defaults() {
        let analyzer = QualityAnalyzer::with_defaults();
        assert_eq!(analyzer.config().email_column, "email");
    }

    #[test]
    fn test_email_percentage_rounding() {
        assert_eq!(email_percentage(0, 0), 0.0);
        assert_eq!(email_percentage(1, 2), 50.0);
        assert_eq!(email_percentage(1, 3), 33.3);
        assert_eq!(email_percentage(2, 3), 66.7);
        assert_eq!(email_percentage(24, 25), 96.0);
        assert_eq!(email_percentage(3, 3), 100.0);
    }

    #[test]
    fn test_summarize_empty_dataset() {
        let summary = summarize(&dataset(vec![]));

        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.missing_values, 0);
        assert_eq!(summary.duplicate_rows, 0);
        assert_eq!(summary.valid_email_count, 0);
        assert_eq!(summary.valid_email_display(), "0.0");
        assert_eq!(summary.quality_tier, QualityTier::Poor);
    }

    #[test]
    fn test_summarize_duplicates() {
        let summary = summarize(&dataset(vec![
            json!({"id": 1, "email": "a@b.com"}),
            json!({"id": 1, "email": "a@b.com"}),
        ]));

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.valid_email_percentage, 100.0);
        assert_eq!(summary.quality_tier, QualityTier::Good);
    }

    #[test]
    fn test_summarize_half_valid_emails() {
        let summary = summarize(&dataset(vec![
            json!({"email": "x"}),
            json!({"email": "a@b.co"}),
        ]));

        assert_eq!(summary.valid_email_percentage, 50.0);
        assert_eq!(summary.quality_tier, QualityTier::Poor);
    }

    #[test]
    fn test_summarize_one_null_field() {
        let summary = summarize(&dataset(vec![
            json!({"id": 1, "email": null}),
            json!({"id": 2, "email": "c@d.com"}),
        ]));

        assert_eq!(summary.missing_values, 1);
    }

    #[test]
    fn test_ninety_six_percent_with_duplicate_is_good() {
        // 24 distinct rows plus one copy of row 0; row 23 has a bad email,
        // leaving 24 of 25 valid
        let mut values: Vec<serde_json::Value> = (0..24)
            .map(|i| json!({"id": i, "email": format!("user{}@example.com", i)}))
            .collect();
        values[23] = json!({"id": 23, "email": "not-an-email"});
        values.push(json!({"id": 0, "email": "user0@example.com"}));
        let data = dataset(values);

        let summary = QualityAnalyzer::with_defaults().summarize(&data);
        assert_eq!(summary.total_rows, 25);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.missing_values, 0);
        assert_eq!(summary.valid_email_percentage, 96.0);
        assert_eq!(summary.quality_tier, QualityTier::Good);
    }

    #[test]
    fn test_summarize_custom_email_column() {
        let analyzer = QualityAnalyzer::new(ValidationConfig::new().with_email_column("contact"));
        let summary = analyzer.summarize(&dataset(vec![
            json!({"contact": "a@b.co", "email": "nope"}),
            json!({"contact": "c@d.co", "email": "nope"}),
        ]));

        assert_eq!(summary.valid_email_count, 2);
        assert_eq!(summary.quality_tier, QualityTier::Excellent);
    }

    #[test]
    fn test_summarize_tolerates_unexpected_types() {
        let summary = summarize(&dataset(vec![
            json!({"id": [1, 2], "email": {"address": "a@b.co"}}),
            json!({"id": true, "email": 12}),
        ]));

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.missing_values, 0);
        assert_eq!(summary.valid_email_count, 0);
    }

    #[test]
    fn test_summarize_lenient_thresholds() {
        let config = ValidationConfig::new()
            .with_excellent_min_email_pct(50.0)
            .with_good_min_email_pct(40.0);
        let summary = QualityAnalyzer::new(config).summarize(&dataset(vec![
            json!({"email": "x"}),
            json!({"email": "a@b.co"}),
        ]));

        assert_eq!(summary.quality_tier, QualityTier::Excellent);
    }
}
