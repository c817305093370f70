//! Core data structures and validation for leadcheck.
//!
//! This crate loads row-oriented marketing datasets and summarizes their
//! quality: row count, missing values, duplicate rows, valid-email share and
//! a coarse quality tier. It also renders the lead-scoring CSV export.
//!
//! # Guarantees
//! - Validation summaries contain counts and ratios, never row values
//! - Summarization is pure and never fails on malformed rows
//! - The only network call is the optional upload endpoint request
//!
//! # Architecture
//! - [`ingest`]: loader trait plus factory for upload, local file and sample sources
//! - [`quality`]: the validation summarizer
//! - [`export`]: lead score table and CSV rendering

pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod quality;

// Re-export commonly used types
pub use error::{LeadcheckError, Result};
pub use export::{LeadScore, LeadStats, ScoreLevel, builtin_leads, export_leads_csv};
pub use ingest::{DatasetLoader, IngestConfig, IngestSource, create_loader, sample_dataset};
pub use logging::init_logging;
pub use models::{CellValue, Dataset, DatasetSource, Row};
pub use quality::{QualityAnalyzer, QualityTier, ValidationConfig, ValidationSummary, summarize};
