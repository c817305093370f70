//! Rendering and file output for validation results and lead exports.

use std::path::Path;

use leadcheck_core::{Dataset, LeadcheckError, Result, ValidationSummary};

/// Renders the first `limit` rows as a left-aligned table.
///
/// Cells missing from a row render blank, as do nulls.
pub fn render_preview(dataset: &Dataset, limit: usize) -> String {
    let rows = dataset.preview(limit);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            dataset
                .columns
                .iter()
                .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = dataset
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len().saturating_add(2));
    lines.push(format_line(&dataset.columns));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(cells.iter().map(|row| format_line(row)));
    lines.join("\n")
}

/// Renders the summary block shown under the preview.
pub fn render_summary(summary: &ValidationSummary) -> String {
    format!(
        "Validation Summary\n  \
         Total rows:      {}\n  \
         Missing values:  {}\n  \
         Duplicate rows:  {}\n  \
         Valid emails:    {}%\n  \
         Data quality:    {}",
        summary.total_rows,
        summary.missing_values,
        summary.duplicate_rows,
        summary.valid_email_display(),
        summary.quality_tier
    )
}

/// Full text report: source line, preview table and summary block.
pub fn render_text(dataset: &Dataset, summary: &ValidationSummary, preview_rows: usize) -> String {
    format!(
        "Dataset: {} ({} rows, {} columns)\n\n{}\n\n{}",
        dataset.source,
        dataset.len(),
        dataset.columns.len(),
        render_preview(dataset, preview_rows),
        render_summary(summary)
    )
}

/// JSON report with the source, preview rows and summary.
///
/// # Errors
/// Returns a serialization error if the report cannot be encoded.
pub fn render_json(
    dataset: &Dataset,
    summary: &ValidationSummary,
    preview_rows: usize,
) -> Result<String> {
    let report = serde_json::json!({
        "source": dataset.source,
        "columns": dataset.columns,
        "preview": dataset.preview(preview_rows),
        "summary": summary,
    });
    serde_json::to_string_pretty(&report).map_err(|e| LeadcheckError::Serialization {
        context: "Failed to encode validation report".to_string(),
        source: e,
    })
}

/// Writes text output to a file.
///
/// # Errors
/// Returns an I/O error if the file cannot be written.
pub async fn save_text(contents: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, contents)
        .await
        .map_err(|e| LeadcheckError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })?;
    Ok(())
}
