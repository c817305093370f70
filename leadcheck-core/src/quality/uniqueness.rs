//! Duplicate row detection.

use std::collections::HashSet;

use crate::models::Row;

/// Counts rows that repeat a row seen earlier in the sequence.
///
/// Rows are compared by their sorted-key serialization. The first occurrence
/// of a repeated row is not counted, so the result equals
/// `rows.len() - distinct rows`.
pub fn count_duplicate_rows(rows: &[Row]) -> u64 {
    let mut seen_rows: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut duplicate_count: u64 = 0;

    for row in rows {
        if !seen_rows.insert(row.canonical_key()) {
            duplicate_count = duplicate_count.saturating_add(1);
        }
    }

    duplicate_count
}
