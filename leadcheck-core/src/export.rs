//! Lead score table and CSV export.
//!
//! The export has a fixed header, one line per lead, `\n` separators and no
//! trailing newline. Records go through the `csv` writer, so fields with
//! commas stay in their column. Scores and confidences are printed as whole
//! percentages.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::LeadcheckError;

/// Header row of the lead export.
pub const EXPORT_HEADER: [&str; 6] = [
    "User ID",
    "Email",
    "Lead Score",
    "Score Level",
    "Segment",
    "Confidence",
];

/// Default file name for the lead export.
pub const DEFAULT_EXPORT_FILE: &str = "LeadScoringResults.csv";

/// A scored marketing contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub id: String,
    pub email: String,
    /// Lead score (0.0-1.0)
    pub score: f64,
    pub segment: String,
    /// Model confidence (0.0-1.0)
    pub confidence: f64,
}

impl LeadScore {
    /// Creates a lead score.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        score: f64,
        segment: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            score,
            segment: segment.into(),
            confidence,
        }
    }

    /// Score level bucket for this lead.
    pub fn level(&self) -> ScoreLevel {
        ScoreLevel::from_score(self.score)
    }
}

/// Score bucket shown next to each lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLevel {
    High,
    Medium,
    Low,
}

impl ScoreLevel {
    /// `High` from 0.8, `Medium` from 0.6, `Low` below.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ScoreLevel::High
        } else if score >= 0.6 {
            ScoreLevel::Medium
        } else {
            ScoreLevel::Low
        }
    }
}

impl std::fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreLevel::High => write!(f, "High"),
            ScoreLevel::Medium => write!(f, "Medium"),
            ScoreLevel::Low => write!(f, "Low"),
        }
    }
}

/// Formats a 0-1 ratio as a whole percentage, e.g. `0.92` as `92%`.
fn whole_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Renders leads as CSV text.
///
/// With a `segment_filter`, only leads whose segment matches it exactly are
/// written. Fields holding a comma, quote or line break are quoted; all
/// others are written bare.
///
/// # Errors
/// Returns an I/O error if a record cannot be encoded.
pub fn export_leads_csv(leads: &[LeadScore], segment_filter: Option<&str>) -> Result<String> {
    let encode_failed = |e: csv::Error| LeadcheckError::io("Failed to encode lead export", e.into());

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER).map_err(encode_failed)?;
    for lead in leads
        .iter()
        .filter(|lead| segment_filter.is_none_or(|segment| lead.segment == segment))
    {
        let score = whole_percent(lead.score);
        let level = lead.level().to_string();
        let confidence = whole_percent(lead.confidence);
        writer
            .write_record([
                lead.id.as_str(),
                lead.email.as_str(),
                score.as_str(),
                level.as_str(),
                lead.segment.as_str(),
                confidence.as_str(),
            ])
            .map_err(encode_failed)?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        LeadcheckError::io("Failed to finish lead export", e.into_error())
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let text: &str = text.as_ref();
    Ok(text.strip_suffix('\n').unwrap_or(text).to_string())
}

/// Per-segment counts and averages over a lead table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub high_value: usize,
    pub medium: usize,
    pub low_priority: usize,
    pub avg_score: f64,
    pub avg_confidence: f64,
}

impl LeadStats {
    /// Computes stats over all leads. Averages are 0 for an empty table.
    pub fn from_leads(leads: &[LeadScore]) -> Self {
        let count_segment = |name: &str| leads.iter().filter(|l| l.segment == name).count();
        let average = |f: fn(&LeadScore) -> f64| {
            if leads.is_empty() {
                0.0
            } else {
                leads.iter().map(f).sum::<f64>() / leads.len() as f64
            }
        };

        Self {
            high_value: count_segment("High Value"),
            medium: count_segment("Medium"),
            low_priority: count_segment("Low Priority"),
            avg_score: average(|l: &LeadScore| l.score),
            avg_confidence: average(|l: &LeadScore| l.confidence),
        }
    }
}

/// The fixed lead table used for demos and exports without input data.
pub fn builtin_leads() -> Vec<LeadScore> {
    vec![
        LeadScore::new("U001", "john@example.com", 0.92, "High Value", 0.87),
        LeadScore::new("U002", "sarah@example.com", 0.78, "Medium", 0.82),
        LeadScore::new("U003", "mike@example.com", 0.95, "High Value", 0.91),
        LeadScore::new("U004", "emma@example.com", 0.45, "Low Priority", 0.76),
        LeadScore::new("U005", "david@example.com", 0.83, "Medium", 0.85),
        LeadScore::new("U006", "lisa@example.com", 0.67, "Medium", 0.79),
        LeadScore::new("U007", "alex@example.com", 0.89, "High Value", 0.88),
        LeadScore::new("U008", "maria@example.com", 0.34, "Low Priority", 0.72),
    ]
}
