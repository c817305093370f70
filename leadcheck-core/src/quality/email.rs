//! Email shape validation.
//!
//! The pattern is a permissive single-`@` shape, not RFC 5322: one or more
//! characters that are neither whitespace nor `@`, then `@`, then the same
//! class, a dot, and the same class again.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Row;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!("Failed to compile email pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Returns true if `value` has the shape `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_some_and(|regex| regex.is_match(value))
}

/// Counts rows whose `column` holds a string with a valid email shape.
///
/// Rows without the column, and non-string values, do not match.
pub fn count_valid_emails(rows: &[Row], column: &str) -> u64 {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter_map(|value| value.as_str())
        .filter(|value| is_valid_email(value))
        .count() as u64
}
