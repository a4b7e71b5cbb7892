// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Secret accessor backed by a Key-Vault-style service.
//!
//! [`VaultClient`] authenticates with the workload identity and reads named
//! secrets over the vault's REST interface. Lookups happen only at startup,
//! to resolve the storage write credential; nothing in the request path ever
//! talks to the vault.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::CredentialError;
use crate::identity::{AccessToken, WorkloadIdentity};

/// OAuth2 scope for vault access.
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Vault REST API version.
const VAULT_API_VERSION: &str = "7.4";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Vault client holding an access token acquired at startup.
pub struct VaultClient {
    client: Client,
    vault_url: String,
    token: AccessToken,
}

impl VaultClient {
    /// Connect to the vault by exchanging the workload identity for a
    /// vault-scoped access token.
    pub async fn connect(
        vault_url: impl Into<String>,
        identity: &WorkloadIdentity,
    ) -> Result<Self, CredentialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CredentialError::NetworkError(e.to_string()))?;

        let token = identity.acquire_token(&client, VAULT_SCOPE).await?;

        Ok(Self {
            client,
            vault_url: vault_url.into(),
            token,
        })
    }

    /// Build a client around an already-acquired token.
    ///
    /// Used by tests to skip the exchange; production code goes through
    /// [`VaultClient::connect`].
    pub fn with_token(vault_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            client: Client::new(),
            vault_url: vault_url.into(),
            token,
        }
    }

    /// Fetch the current value of a named secret.
    pub async fn get_secret(&self, name: &str) -> Result<String, CredentialError> {
        let url = format!(
            "{}/secrets/{}?api-version={}",
            self.vault_url.trim_end_matches('/'),
            name,
            VAULT_API_VERSION
        );

        debug!(secret = %name, "Fetching vault secret");

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", self.token.token))
            .send()
            .await
            .map_err(|e| CredentialError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(CredentialError::SecretNotFound(name.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CredentialError::vault(error_text, status.as_u16()));
        }

        let secret: SecretResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::ParseError(e.to_string()))?;

        Ok(secret.value)
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SecretResponse {
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token() -> AccessToken {
        AccessToken {
            token: "at-123".to_string(),
            expires_in_secs: 3600,
        }
    }

    #[tokio::test]
    async fn test_get_secret_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/secrets/storage-sas"))
            .and(query_param("api-version", VAULT_API_VERSION))
            .and(header("authorization", "Bearer at-123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"value": "sv=signed-token"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let vault = VaultClient::with_token(server.uri(), token());
        let value = vault.get_secret("storage-sas").await.unwrap();
        assert_eq!(value, "sv=signed-token");
    }

    #[tokio::test]
    async fn test_get_secret_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let vault = VaultClient::with_token(server.uri(), token());
        let err = vault.get_secret("missing").await.unwrap_err();
        match err {
            CredentialError::SecretNotFound(name) => assert_eq!(name, "missing"),
            other => panic!("Expected SecretNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_secret_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("access denied"))
            .mount(&server)
            .await;

        let vault = VaultClient::with_token(server.uri(), token());
        let err = vault.get_secret("storage-sas").await.unwrap_err();
        assert!(matches!(
            err,
            CredentialError::VaultError {
                status_code: Some(403),
                ..
            }
        ));
    }
}
