//! Built-in sample dataset.

use async_trait::async_trait;

use super::DatasetLoader;
use crate::Result;
use crate::models::{Dataset, DatasetSource, Row};

/// Columns of the built-in sample, in display order.
pub const SAMPLE_COLUMNS: [&str; 5] = ["id", "email", "age", "location", "engagement"];

/// Returns the fixed five-row sample dataset.
pub fn sample_dataset() -> Dataset {
    let rows = [
        ("U001", "john@example.com", 28, "NY", 0.85),
        ("U002", "sarah@example.com", 34, "CA", 0.72),
        ("U003", "mike@example.com", 41, "TX", 0.91),
        ("U004", "emma@example.com", 29, "FL", 0.68),
        ("U005", "david@example.com", 37, "WA", 0.79),
    ]
    .into_iter()
    .map(|(id, email, age, location, engagement)| {
        Row::new()
            .with("id", id)
            .with("email", email)
            .with("age", i64::from(age))
            .with("location", location)
            .with("engagement", engagement)
    })
    .collect();

    Dataset::new(
        SAMPLE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        rows,
        DatasetSource::Sample,
    )
}

/// Loader for the built-in sample. Never fails and never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleLoader;

#[async_trait]
impl DatasetLoader for SampleLoader {
    async fn load(&self) -> Result<Dataset> {
        tracing::debug!("Loading built-in sample dataset");
        Ok(sample_dataset())
    }

    fn describe(&self) -> String {
        DatasetSource::Sample.to_string()
    }
}
