//! Remote parsing through the upload endpoint.
//!
//! The file goes to `POST {endpoint}/upload` as a multipart body with a single
//! `file` part. The endpoint answers with `{columns, sample, fullData}` on
//! success or `{error}` on failure. Any failure, including a rejected
//! request, ends ingestion with no dataset; nothing is retried.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DatasetLoader, IngestConfig, check_file_size, display_name};
use crate::Result;
use crate::error::{LeadcheckError, redact_endpoint_url};
use crate::models::{Dataset, DatasetSource, derive_columns, rows_from_json};

/// Response body of the upload endpoint.
///
/// `Failure` is tried first so a body carrying `error` is always an error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Failure {
        error: String,
    },
    Parsed {
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        sample: Vec<serde_json::Value>,
        #[serde(rename = "fullData")]
        full_data: Vec<serde_json::Value>,
    },
}

/// Appends `/upload` to the endpoint path.
pub fn upload_url(endpoint: &url::Url) -> url::Url {
    let mut url = endpoint.clone();
    let path = format!("{}/upload", endpoint.path().trim_end_matches('/'));
    url.set_path(&path);
    url
}

/// Turns an upload endpoint response into a dataset.
///
/// Rows come from `fullData`. Columns come from `columns`, or when that is
/// empty from the keys of `sample`, or failing that from `fullData`.
///
/// # Errors
/// Returns a parse error carrying the endpoint's message for `{error}`
/// bodies, and a parse error naming the status for any other failure.
pub fn interpret_response(status: u16, body: &str, file_name: &str) -> Result<Dataset> {
    let success = (200..300).contains(&status);
    let response = serde_json::from_str::<UploadResponse>(body);

    match response {
        Ok(UploadResponse::Failure { error }) => Err(LeadcheckError::parse(error)),
        Ok(UploadResponse::Parsed { .. }) | Err(_) if !success => Err(LeadcheckError::parse(
            format!("Upload endpoint returned HTTP {}", status),
        )),
        Err(e) => Err(LeadcheckError::parse(format!(
            "Unexpected upload endpoint response: {}",
            e
        ))),
        Ok(UploadResponse::Parsed {
            columns,
            sample,
            full_data,
        }) => {
            let (rows, dropped) = rows_from_json(full_data);
            if dropped > 0 {
                tracing::warn!(
                    "{}: skipped {} rows that were not objects",
                    file_name,
                    dropped
                );
            }

            let columns = if !columns.is_empty() {
                columns
            } else {
                let (sample_rows, _) = rows_from_json(sample);
                if sample_rows.is_empty() {
                    derive_columns(&rows)
                } else {
                    derive_columns(&sample_rows)
                }
            };

            Ok(Dataset::new(
                columns,
                rows,
                DatasetSource::Upload {
                    file_name: file_name.to_string(),
                },
            ))
        }
    }
}

/// Loads a dataset by sending a file to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadLoader {
    path: PathBuf,
    endpoint: url::Url,
    config: IngestConfig,
}

impl UploadLoader {
    /// Creates an upload loader.
    ///
    /// # Errors
    /// Returns a configuration error if `config` has no endpoint.
    pub fn new(path: impl Into<PathBuf>, config: IngestConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            LeadcheckError::configuration("Upload requires an endpoint URL")
        })?;
        Ok(Self {
            path: path.into(),
            endpoint,
            config,
        })
    }

    fn client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| LeadcheckError::upload_failed("Failed to build HTTP client", e))
    }
}

#[async_trait]
impl DatasetLoader for UploadLoader {
    async fn load(&self) -> Result<Dataset> {
        let file_name = display_name(&self.path);
        check_file_size(&self.path, self.config.max_file_bytes).await?;

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            LeadcheckError::io(format!("Failed to read {}", self.path.display()), e)
        })?;

        let url = upload_url(&self.endpoint);
        tracing::info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            bytes.len(),
            redact_endpoint_url(url.as_str())
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client()?
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upload request for {} failed: {}", file_name, e);
                LeadcheckError::upload_failed(format!("Upload of '{}' rejected", file_name), e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            LeadcheckError::upload_failed(format!("Failed to read response for '{}'", file_name), e)
        })?;

        let dataset = interpret_response(status, &body, &file_name).inspect_err(|e| {
            tracing::error!("Upload endpoint could not parse {}: {}", file_name, e);
        })?;

        tracing::info!(
            "Endpoint parsed {} rows with {} columns",
            dataset.len(),
            dataset.columns.len()
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        format!(
            "{} via {}",
            self.path.display(),
            redact_endpoint_url(self.endpoint.as_str())
        )
    }
}
