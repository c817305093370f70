//! Core data models for row-oriented marketing datasets.
//!
//! Rows arrive from several places (the upload endpoint, local CSV/JSON
//! files, the built-in sample) with arbitrary key sets, so a row is an
//! insertion-ordered mapping from column name to a tagged scalar rather than
//! a fixed struct.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A single cell of a dataset row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Explicit null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Numeric value, kept in its original JSON form
    Number(serde_json::Number),
    /// String value
    String(String),
    /// Array or object that arrived from JSON input
    Nested(serde_json::Value),
}

impl CellValue {
    /// Returns true for null and the empty string.
    ///
    /// Absent keys are handled by the caller, since a value that does not
    /// exist has no `CellValue`.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string contents if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the cell back into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Boolean(b) => serde_json::Value::Bool(*b),
            CellValue::Number(n) => serde_json::Value::Number(n.clone()),
            CellValue::String(s) => serde_json::Value::String(s.clone()),
            CellValue::Nested(v) => v.clone(),
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Nested(serde_json::Value::Array(_)) => "array",
            CellValue::Nested(_) => "object",
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Nested(v) => write!(f, "{}", v),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Boolean(b),
            serde_json::Value::Number(n) => CellValue::Number(n),
            serde_json::Value::String(s) => CellValue::String(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                CellValue::Nested(nested)
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON representation and become null.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(CellValue::Null, CellValue::Number)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(CellValue::from)
    }
}

/// One record of a dataset: column name to cell, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method that sets a cell and returns the row.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell, replacing any existing value for the column in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Returns the cell for a column, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns true if the row has a cell for the column.
    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Serializes the row with sorted keys.
    ///
    /// Two rows holding the same key-value pairs produce the same key
    /// regardless of insertion order. Integral floats are written as
    /// integers, so `1` and `1.0` give the same key.
    pub fn canonical_key(&self) -> String {
        let sorted: BTreeMap<&str, serde_json::Value> = self
            .cells
            .iter()
            .map(|(name, value)| (name.as_str(), canonical_number(value.to_json())))
            .collect();
        serde_json::to_string(&sorted).unwrap_or_else(|e| {
            tracing::trace!("Failed to serialize row for duplicate detection: {}", e);
            String::new()
        })
    }

    /// Builds a row from a JSON value.
    ///
    /// Returns `None` when the value is not an object.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }
}

/// Rewrites integral floats as integers, recursing into arrays and objects.
fn canonical_number(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(n) if !n.is_i64() && !n.is_u64() => {
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = f as i64;
                    serde_json::Value::from(whole)
                }
                _ => serde_json::Value::Number(n),
            }
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(canonical_number).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, canonical_number(item)))
                .collect(),
        ),
        other => other,
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    /// Parsed by the remote upload endpoint
    Upload { file_name: String },
    /// Parsed in-process from a local CSV or JSON file
    LocalFile { file_name: String },
    /// The built-in sample rows
    Sample,
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Upload { file_name } => write!(f, "{} (uploaded)", file_name),
            DatasetSource::LocalFile { file_name } => write!(f, "{}", file_name),
            DatasetSource::Sample => write!(f, "sample data"),
        }
    }
}

/// Ordered rows plus their ordered column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub source: DatasetSource,
}

impl Dataset {
    /// Creates a dataset with an externally supplied column list.
    pub fn new(columns: Vec<String>, rows: Vec<Row>, source: DatasetSource) -> Self {
        Self {
            columns,
            rows,
            source,
        }
    }

    /// Creates a dataset whose columns are derived from all of its rows.
    pub fn from_rows(rows: Vec<Row>, source: DatasetSource) -> Self {
        let columns = derive_columns(&rows);
        Self::new(columns, rows, source)
    }

    /// Returns at most the first `limit` rows.
    pub fn preview(&self, limit: usize) -> &[Row] {
        &self.rows[..self.rows.len().min(limit)]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Union of the keys of `rows`, in first-seen order.
pub fn derive_columns(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

/// Converts JSON values into rows, dropping anything that is not an object.
///
/// Returns the rows and the number of values that were dropped.
pub fn rows_from_json(values: Vec<serde_json::Value>) -> (Vec<Row>, usize) {
    let total = values.len();
    let rows: Vec<Row> = values.into_iter().filter_map(Row::from_json).collect();
    let dropped = total.saturating_sub(rows.len());
    (rows, dropped)
}
