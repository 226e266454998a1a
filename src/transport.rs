//! HTTP transports for the remote indexing service.
//!
//! Two narrow trait seams keep the pipeline testable without a network:
//!
//! - [`BinaryTransport`] — streams a file to the upload endpoint while
//!   reporting byte-level progress, resolving the server-assigned
//!   [`SourceReference`] once the transfer completes.
//! - [`StatusTransport`] — queries (and deletes) an uploaded source by
//!   reference id.
//!
//! [`HttpTransport`] implements both over reqwest. Transport failures are
//! surfaced to the caller unchanged; nothing is retried here.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart;
use reqwest::Body;
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;

use crate::config::IndexerConfig;
use crate::models::SourceReference;
use crate::query::QueryResultItem;

/// Progress of a running binary transfer, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct TransferProgress {
    pub loaded: u64,
    pub total: u64,
}

/// Streams binary content to the indexing service.
#[async_trait]
pub trait BinaryTransport: Send + Sync {
    /// Uploads `file` with the given extra form fields.
    ///
    /// Emits [`TransferProgress`] events on `progress` as bytes go out and
    /// resolves the server-assigned content reference when the transfer
    /// completes.
    async fn send(
        &self,
        file: &Path,
        fields: &[(String, String)],
        progress: mpsc::Sender<TransferProgress>,
    ) -> Result<SourceReference>;
}

/// Queries the indexing status of an uploaded source.
#[async_trait]
pub trait StatusTransport: Send + Sync {
    /// Fetches the current reference, including its indexing status.
    async fn status(&self, id: &str) -> Result<SourceReference>;

    /// Deletes the uploaded source on the server.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Reqwest-backed implementation of both transport traits.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &IndexerConfig) -> Result<Self> {
        // Only the connect phase is bounded client-wide; uploads of large
        // files must be allowed to outlive any fixed request timeout.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url, relative)
    }

    /// Runs a semantic query against a group's indexed content.
    pub async fn query(
        &self,
        group_id: i64,
        text: &str,
        limit: i64,
    ) -> Result<Vec<QueryResultItem>> {
        let response = self
            .client
            .get(self.url("query"))
            .query(&[
                ("group_id", group_id.to_string()),
                ("query", text.to_string()),
                ("limit", limit.to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .context("query request failed")?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response.json().await.context("invalid query response")
    }
}

#[async_trait]
impl BinaryTransport for HttpTransport {
    async fn send(
        &self,
        file: &Path,
        fields: &[(String, String)],
        progress: mpsc::Sender<TransferProgress>,
    ) -> Result<SourceReference> {
        let handle = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("Failed to open file: {}", file.display()))?;
        let total = handle.metadata().await?.len();
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let mut loaded = 0u64;
        let counted = ReaderStream::new(handle).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                loaded += bytes.len() as u64;
                // try_send: progress is advisory, the transfer must not block on it
                let _ = progress.try_send(TransferProgress { loaded, total });
            }
            chunk
        });

        let part = multipart::Part::stream_with_length(Body::wrap_stream(counted), total)
            .file_name(file_name);
        let mut form = multipart::Form::new().part("upload_file", part);
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .client
            .post(self.url("sources/single"))
            .multipart(form)
            .send()
            .await
            .context("upload request failed")?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response.json().await.context("invalid upload response")
    }
}

#[async_trait]
impl StatusTransport for HttpTransport {
    async fn status(&self, id: &str) -> Result<SourceReference> {
        let response = self
            .client
            .get(self.url(&format!("sources/{}", id)))
            .timeout(self.timeout)
            .send()
            .await
            .context("status request failed")?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response.json().await.context("invalid status response")
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("sources/{}", id)))
            .timeout(self.timeout)
            .send()
            .await
            .context("delete request failed")?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        Ok(())
    }
}

async fn service_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    anyhow::anyhow!("indexing service error {}: {}", status, body)
}
