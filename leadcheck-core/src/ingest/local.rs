//! In-process parsing of local CSV and JSON files.
//!
//! CSV cells are always strings: an empty cell becomes `""`, which the
//! summarizer counts as missing, and a short record leaves its trailing
//! columns absent. JSON input is either an array of row objects or an object
//! with a `rows` array and an optional `columns` array.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DatasetLoader, IngestConfig, check_file_size, display_name};
use crate::error::LeadcheckError;
use crate::models::{Dataset, DatasetSource, Row, derive_columns, rows_from_json};
use crate::Result;

/// Supported local file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Parses CSV bytes with a header row.
///
/// # Errors
/// Returns a parse error on malformed CSV or invalid UTF-8.
pub fn parse_csv(bytes: &[u8], source: DatasetSource) -> Result<Dataset> {
    let name = source.to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| LeadcheckError::parse_file(&name, e))?
        .clone();

    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for header in &headers {
        if !columns.iter().any(|c| c == header) {
            columns.push(header.to_string());
        }
    }

    let mut rows = Vec::new();
    let mut overlong_records: usize = 0;
    for record in reader.records() {
        let record = record.map_err(|e| LeadcheckError::parse_file(&name, e))?;
        if record.len() > headers.len() {
            overlong_records = overlong_records.saturating_add(1);
        }
        let row: Row = headers.iter().zip(record.iter()).collect();
        rows.push(row);
    }

    if overlong_records > 0 {
        tracing::debug!(
            "{}: ignored fields beyond the header in {} records",
            name,
            overlong_records
        );
    }

    Ok(Dataset::new(columns, rows, source))
}

/// Parses JSON bytes holding an array of rows or a `{"rows": [...]}` object.
///
/// Elements that are not objects are dropped with a warning.
///
/// # Errors
/// Returns a parse error on malformed JSON or an unexpected top-level shape.
pub fn parse_json(bytes: &[u8], source: DatasetSource) -> Result<Dataset> {
    let name = source.to_string();
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| LeadcheckError::parse_file(&name, e))?;

    let (values, declared_columns) = match value {
        serde_json::Value::Array(values) => (values, None),
        serde_json::Value::Object(mut object) => {
            let values = match object.remove("rows") {
                Some(serde_json::Value::Array(values)) => values,
                _ => {
                    return Err(LeadcheckError::parse_file(
                        &name,
                        "expected an array of rows or an object with a \"rows\" array",
                    ));
                }
            };
            let columns = match object.remove("columns") {
                Some(serde_json::Value::Array(columns)) => Some(
                    columns
                        .into_iter()
                        .filter_map(|c| c.as_str().map(str::to_string))
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            };
            (values, columns)
        }
        _ => {
            return Err(LeadcheckError::parse_file(
                &name,
                "expected an array of rows or an object with a \"rows\" array",
            ));
        }
    };

    let (rows, dropped) = rows_from_json(values);
    if dropped > 0 {
        tracing::warn!("{}: skipped {} rows that were not objects", name, dropped);
    }

    let columns = match declared_columns {
        Some(columns) if !columns.is_empty() => columns,
        _ => derive_columns(&rows),
    };

    Ok(Dataset::new(columns, rows, source))
}

/// Loads a dataset from a local CSV or JSON file.
#[derive(Debug, Clone)]
pub struct LocalFileLoader {
    path: PathBuf,
    config: IngestConfig,
}

impl LocalFileLoader {
    /// Creates a loader for `path`.
    pub fn new(path: impl Into<PathBuf>, config: IngestConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetLoader for LocalFileLoader {
    async fn load(&self) -> Result<Dataset> {
        let file_name = display_name(&self.path);
        let format = FileFormat::from_path(&self.path).ok_or_else(|| {
            LeadcheckError::parse(format!(
                "Unsupported file format for '{}': expected .csv or .json",
                file_name
            ))
        })?;

        check_file_size(&self.path, self.config.max_file_bytes).await?;

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            LeadcheckError::io(format!("Failed to read {}", self.path.display()), e)
        })?;

        tracing::info!("Parsing {} ({} bytes)", file_name, bytes.len());

        let source = DatasetSource::LocalFile { file_name };
        let dataset = match format {
            FileFormat::Csv => parse_csv(&bytes, source)?,
            FileFormat::Json => parse_json(&bytes, source)?,
        };

        tracing::info!(
            "Loaded {} rows with {} columns",
            dataset.len(),
            dataset.columns.len()
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn local(name: &str) -> DatasetSource {
        DatasetSource::LocalFile {
            file_name: name.to_string(),
        }
    }

    #[test]
    fn test_file_format_detection() {
        assert_eq!(FileFormat::from_path(Path::new("a.csv")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("a.CSV")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("a.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("a.xlsx")), None);
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_parse_csv_basic() {
        let csv = "id,email,age\nU001,john@example.com,28\nU002,sarah@example.com,34\n";
        let dataset = parse_csv(csv.as_bytes(), local("leads.csv")).unwrap();

        assert_eq!(dataset.columns, vec!["id", "email", "age"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[0].get("age"), Some(&CellValue::from("28")));
    }

    #[test]
    fn test_parse_csv_empty_cells_are_empty_strings() {
        let csv = "id,email\nU001,\n,b@c.com\n";
        let dataset = parse_csv(csv.as_bytes(), local("leads.csv")).unwrap();

        assert_eq!(dataset.rows[0].get("email"), Some(&CellValue::from("")));
        assert_eq!(dataset.rows[1].get("id"), Some(&CellValue::from("")));
    }

    #[test]
    fn test_parse_csv_short_record_leaves_columns_absent() {
        let csv = "id,email,age\nU001,a@b.com\n";
        let dataset = parse_csv(csv.as_bytes(), local("leads.csv")).unwrap();

        assert!(!dataset.rows[0].contains_key("age"));
        assert_eq!(dataset.columns.len(), 3);
    }

    #[test]
    fn test_parse_csv_ignores_extra_fields() {
        let csv = "id\nU001,extra\n";
        let dataset = parse_csv(csv.as_bytes(), local("leads.csv")).unwrap();

        assert_eq!(dataset.rows[0].len(), 1);
    }

    #[test]
    fn test_parse_csv_header_only() {
        let dataset = parse_csv(b"id,email\n", local("empty.csv")).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns, vec!["id", "email"]);
    }

    #[test]
    fn test_parse_csv_invalid_utf8() {
        let err = parse_csv(b"id\n\xff\xfe\n", local("bad.csv")).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_parse_json_array() {
        let json = br#"[{"id": 1, "email": "a@b.com"}, {"id": 2, "extra": true}]"#;
        let dataset = parse_json(json, local("rows.json")).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns, vec!["id", "email", "extra"]);
    }

    #[test]
    fn test_parse_json_rows_object_with_columns() {
        let json = br#"{"columns": ["email", "id"], "rows": [{"id": 1, "email": "a@b.com"}]}"#;
        let dataset = parse_json(json, local("rows.json")).unwrap();

        assert_eq!(dataset.columns, vec!["email", "id"]);
    }

    #[test]
    fn test_parse_json_drops_non_object_rows() {
        let json = br#"[{"id": 1}, 7, "text", null]"#;
        let dataset = parse_json(json, local("rows.json")).unwrap();

        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_parse_json_rejects_scalars() {
        let err = parse_json(b"42", local("rows.json")).unwrap_err();
        assert!(err.is_parse_error());

        let err = parse_json(br#"{"data": []}"#, local("rows.json")).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json(b"[{\"id\": ", local("rows.json")).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn test_local_loader_reads_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketing_dataset.csv");
        std::fs::write(&path, "id,email\nU001,john@example.com\n").unwrap();

        let loader = LocalFileLoader::new(&path, IngestConfig::default());
        let dataset = loader.load().await.unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.source,
            DatasetSource::LocalFile {
                file_name: "marketing_dataset.csv".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_local_loader_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, "irrelevant").unwrap();

        let err = LocalFileLoader::new(&path, IngestConfig::default())
            .load()
            .await
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn test_local_loader_missing_file() {
        let err = LocalFileLoader::new("/nonexistent/leads.csv", IngestConfig::default())
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LeadcheckError::Io { .. }));
    }
}
