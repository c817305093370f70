//! Dataset loaders and factory.
//!
//! A dataset can come from three places: the remote upload endpoint, which
//! parses the file for us; a local CSV or JSON file parsed in-process; or the
//! built-in sample. Each is a [`DatasetLoader`], and [`create_loader`] picks
//! one from an [`IngestSource`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::{Result, error::LeadcheckError, models::Dataset};

pub mod local;
pub mod sample;
#[cfg(feature = "upload")]
pub mod upload;

pub use local::{FileFormat, LocalFileLoader, parse_csv, parse_json};
pub use sample::{SampleLoader, sample_dataset};
#[cfg(feature = "upload")]
pub use upload::{UploadLoader, interpret_response, upload_url};

/// Largest file accepted for ingestion: 100 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Configuration for dataset ingestion.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Base URL of the upload endpoint; `/upload` is appended
    pub endpoint: Option<url::Url>,
    /// Request timeout for the upload call; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Files larger than this are rejected before reading
    pub max_file_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl IngestConfig {
    /// Creates a new ingest config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the upload endpoint.
    ///
    /// # Errors
    /// Returns a configuration error if the URL does not parse or is not
    /// http(s).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let parsed = url::Url::parse(endpoint).map_err(|e| {
            LeadcheckError::configuration(format!(
                "Invalid upload endpoint '{}': {}",
                crate::error::redact_endpoint_url(endpoint),
                e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LeadcheckError::configuration(format!(
                "Upload endpoint must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.endpoint = Some(parsed);
        Ok(self)
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the file size limit.
    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }
}

/// Where to load a dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestSource {
    /// Send the file to the upload endpoint for parsing
    Upload(PathBuf),
    /// Parse a local CSV or JSON file
    LocalFile(PathBuf),
    /// Use the built-in sample rows
    Sample,
}

/// Loads a dataset from one source.
///
/// Object-safe, so callers can hold a `Box<dyn DatasetLoader>`.
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    /// Produces the dataset.
    ///
    /// # Errors
    /// Returns a parse error when the source cannot be turned into rows. No
    /// retry is attempted.
    async fn load(&self) -> Result<Dataset>;

    /// Human-readable description of the source for logs.
    fn describe(&self) -> String;
}

/// Creates the loader for a source.
///
/// # Errors
/// Returns a configuration error if an upload is requested without an
/// endpoint, or if upload support is not compiled in.
///
/// # Example
/// ```rust
/// use leadcheck_core::ingest::{IngestConfig, IngestSource, create_loader};
///
/// # async fn example() -> leadcheck_core::Result<()> {
/// let loader = create_loader(IngestSource::Sample, IngestConfig::default())?;
/// let dataset = loader.load().await?;
/// assert_eq!(dataset.len(), 5);
/// # Ok(())
/// # }
/// ```
pub fn create_loader(source: IngestSource, config: IngestConfig) -> Result<Box<dyn DatasetLoader>> {
    match source {
        IngestSource::Sample => Ok(Box::new(SampleLoader)),
        IngestSource::LocalFile(path) => Ok(Box::new(LocalFileLoader::new(path, config))),
        #[cfg(feature = "upload")]
        IngestSource::Upload(path) => Ok(Box::new(UploadLoader::new(path, config)?)),
        #[cfg(not(feature = "upload"))]
        IngestSource::Upload(_) => Err(LeadcheckError::configuration(
            "Upload support not available. Compile with --features upload",
        )),
    }
}

/// File name used in dataset sources and error messages.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Rejects files over the configured size limit.
pub(crate) async fn check_file_size(path: &Path, max_file_bytes: u64) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| LeadcheckError::io(format!("Failed to stat {}", path.display()), e))?;

    if metadata.len() > max_file_bytes {
        return Err(LeadcheckError::parse(format!(
            "'{}' is {} bytes, above the {} byte limit",
            display_name(path),
            metadata.len(),
            max_file_bytes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_config_default() {
        let config = IngestConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.max_file_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_with_endpoint_accepts_http() {
        let config = IngestConfig::new()
            .with_endpoint("http://localhost:8000")
            .unwrap();
        assert_eq!(
            config.endpoint.unwrap().as_str(),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn test_with_endpoint_rejects_other_schemes() {
        let err = IngestConfig::new()
            .with_endpoint("ftp://files.local/")
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_with_endpoint_redacts_invalid_url() {
        let err = IngestConfig::new().with_endpoint("not a url").unwrap_err();
        assert!(matches!(err, LeadcheckError::Configuration { .. }));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/data/leads.csv")), "leads.csv");
    }

    #[cfg(feature = "upload")]
    #[test]
    fn test_create_loader_upload_requires_endpoint() {
        let result = create_loader(
            IngestSource::Upload(PathBuf::from("leads.csv")),
            IngestConfig::default(),
        );
        assert!(matches!(result, Err(LeadcheckError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_create_loader_sample() {
        let loader = create_loader(IngestSource::Sample, IngestConfig::default()).unwrap();
        assert_eq!(loader.describe(), "sample data");

        let dataset = loader.load().await.unwrap();
        assert_eq!(dataset.len(), 5);
    }

    #[tokio::test]
    async fn test_check_file_size_rejects_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, "id\n1\n2\n").unwrap();

        assert!(check_file_size(&path, 1024).await.is_ok());

        let err = check_file_size(&path, 4).await.unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("big.csv"));
    }
}
