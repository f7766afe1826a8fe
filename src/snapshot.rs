//! Drawing snapshot fetch from a relocated authority.
//!
//! The response body is treated as opaque JSON; interpreting it is the
//! caller's business.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("snapshot request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Thin wrapper over a shared HTTP client. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SnapshotClient {
    http: reqwest::Client,
}

impl SnapshotClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on transport failure, a non-success status,
    /// or a body that is not JSON.
    pub async fn fetch(&self, url: &str) -> Result<Value, SnapshotError> {
        debug!(%url, "fetching drawing snapshot");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SnapshotError::Status { status: status.as_u16(), body });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Fetch the snapshot of `drawing_id` from `authority` (`host:port`).
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn fetch_drawing(
        &self,
        config: &ClientConfig,
        authority: &str,
        drawing_id: &str,
    ) -> Result<Value, SnapshotError> {
        self.fetch(&config.snapshot_url(authority, drawing_id)).await
    }
}
