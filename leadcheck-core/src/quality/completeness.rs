//! Missing-value analysis.
//!
//! A cell is missing when it is null, the empty string, or absent. Absent
//! means the dataset's column list names a column the row does not have.
//! Keys a row carries outside the column list are checked only where they
//! are present; other rows are never charged for lacking them.

use std::collections::HashMap;

use crate::models::Dataset;

use super::models::{ColumnCompleteness, CompletenessMetrics};

/// Counts missing cells across every row and column of a dataset.
///
/// The total is a sum over cells, not a per-row flag: a row with two null
/// fields adds two.
pub fn analyze_completeness(dataset: &Dataset) -> CompletenessMetrics {
    if dataset.rows.is_empty() {
        return CompletenessMetrics::default();
    }

    let total_rows = dataset.rows.len() as u64;

    // Declared columns first, then any extras in first-seen order
    let mut column_names: Vec<&str> = dataset.columns.iter().map(String::as_str).collect();
    let declared = column_names.len();
    let mut index: HashMap<&str, usize> = column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i))
        .collect();
    for row in &dataset.rows {
        for key in row.keys() {
            if !index.contains_key(key) {
                index.insert(key, column_names.len());
                column_names.push(key);
            }
        }
    }

    let mut missing_counts: Vec<u64> = vec![0; column_names.len()];
    for row in &dataset.rows {
        for (position, (slot, column_name)) in
            missing_counts.iter_mut().zip(&column_names).enumerate()
        {
            let missing = match row.get(column_name) {
                None => position < declared,
                Some(value) => value.is_missing(),
            };
            if missing {
                *slot = slot.saturating_add(1);
            }
        }
    }

    let total_missing = missing_counts.iter().sum();
    let column_metrics = column_names
        .iter()
        .zip(&missing_counts)
        .map(|(name, missing)| ColumnCompleteness::new(*name, *missing, total_rows))
        .collect();

    CompletenessMetrics {
        total_missing,
        column_metrics,
    }
}
