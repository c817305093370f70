//! Dataset validation module.
//!
//! This module computes the validation summary shown after a dataset load:
//! - **Completeness**: null, empty and absent values, summed over cells
//! - **Uniqueness**: extra copies of rows already seen
//! - **Email validity**: share of rows with a well-shaped email address
//! - **Quality tier**: Excellent, Good or Poor, derived from the above
//!
//! Summaries expose counts and ratios only, never row values.
//!
//! # Example
//! ```rust,ignore
//! use leadcheck_core::quality::{QualityAnalyzer, ValidationConfig};
//!
//! let analyzer = QualityAnalyzer::new(ValidationConfig::default());
//! let summary = analyzer.summarize(&dataset);
//! println!("{} ({}% valid emails)", summary.quality_tier, summary.valid_email_display());
//! ```

mod analyzer;
mod completeness;
mod config;
mod email;
mod models;
mod uniqueness;

// Re-export public API
pub use analyzer::{QualityAnalyzer, summarize};
pub use completeness::analyze_completeness;
pub use config::{
    ConfigValidationError, DEFAULT_EMAIL_COLUMN, DEFAULT_PREVIEW_ROWS, ValidationConfig,
};
pub use email::{count_valid_emails, is_valid_email};
pub use models::{ColumnCompleteness, CompletenessMetrics, QualityTier, ValidationSummary};
pub use uniqueness::count_duplicate_rows;
