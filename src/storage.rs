// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Object-storage writer for generated documentation.
//!
//! [`BlobStore`] uploads one text artifact per run to a blob container via
//! the storage service's REST interface, authorized by a SAS token resolved
//! at startup (directly from the environment or via the vault). A PUT to an
//! existing name overwrites it, which is the whole idempotency story: the
//! same run timestamp always targets the same blob name.
//!
//! The upload is a single request treated as atomic; partial-write recovery
//! is the storage service's problem, not ours.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::StorageError;
use crate::types::{ArtifactStore, StoredArtifact};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Storage service REST API version sent with every request.
const STORAGE_API_VERSION: &str = "2021-08-06";

/// Blob container client authorized by a SAS token.
pub struct BlobStore {
    client: Client,
    endpoint: String,
    container: String,
    sas_token: String,
}

impl BlobStore {
    /// Create a store for one container.
    ///
    /// `sas_token` may carry a leading `?`; it is normalized away.
    pub fn new(
        endpoint: impl Into<String>,
        container: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        let sas_token = sas_token.into();
        let sas_token = sas_token.trim_start_matches('?').to_string();

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            container: container.into(),
            sas_token,
        })
    }

    /// The configured container name.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The blob URL without the SAS query, safe for logging.
    fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.container, blob_name)
    }

    /// Map a non-2xx storage response to an error variant.
    fn handle_error_response(&self, status_code: u16, body: &str) -> StorageError {
        match status_code {
            401 | 403 => StorageError::AuthError(body.to_string()),
            404 => StorageError::ContainerNotFound(self.container.clone()),
            _ => StorageError::api(body.to_string(), status_code),
        }
    }
}

#[async_trait]
impl ArtifactStore for BlobStore {
    async fn put_text(&self, blob_name: &str, body: &str) -> Result<StoredArtifact, StorageError> {
        let url = self.blob_url(blob_name);

        debug!(blob = %url, bytes = body.len(), "Uploading artifact");

        let response = self
            .client
            .put(format!("{}?{}", url, self.sas_token))
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("content-type", "text/plain; charset=utf-8")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.handle_error_response(status.as_u16(), &error_text));
        }

        Ok(StoredArtifact {
            blob_name: blob_name.to_string(),
            container: self.container.clone(),
        })
    }
}
