// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workload identity credential provider.
//!
//! In the cluster, the job runner projects a short-lived OIDC token into the
//! pod and exposes the client/tenant identifiers through the standard
//! `AZURE_*` environment variables. [`WorkloadIdentity`] reads that ambient
//! state once and exchanges the projected token for an OAuth2 access token
//! via the client-credentials flow with a client assertion. No static secret
//! is ever involved.
//!
//! The exchange happens at startup only; per-request traffic never touches
//! the authority.

use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{ConfigError, CredentialError};

/// Default token authority host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Client assertion type for federated OIDC tokens.
const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// An acquired OAuth2 access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in_secs: u64,
}

/// Ambient workload identity, resolved once at process start.
#[derive(Debug, Clone)]
pub struct WorkloadIdentity {
    client_id: String,
    tenant_id: String,
    token_file: PathBuf,
    authority_host: String,
}

impl WorkloadIdentity {
    /// Create an identity from explicit values.
    pub fn new(
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        token_file: impl Into<PathBuf>,
        authority_host: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            token_file: token_file.into(),
            authority_host: authority_host.into(),
        }
    }

    /// Resolve the identity from the standard `AZURE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = env_required("AZURE_CLIENT_ID")?;
        let tenant_id = env_required("AZURE_TENANT_ID")?;
        let token_file = env_required("AZURE_FEDERATED_TOKEN_FILE")?;
        let authority_host = std::env::var("AZURE_AUTHORITY_HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());

        Ok(Self::new(client_id, tenant_id, token_file, authority_host))
    }

    /// Exchange the projected OIDC token for an access token with `scope`.
    ///
    /// The projected token is re-read on every call; the runtime rotates the
    /// file underneath us.
    pub async fn acquire_token(
        &self,
        client: &Client,
        scope: &str,
    ) -> Result<AccessToken, CredentialError> {
        let assertion = std::fs::read_to_string(&self.token_file)
            .map_err(|e| CredentialError::TokenFileUnreadable(e.to_string()))?;
        let assertion = assertion.trim().to_string();

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        );

        debug!(scope = %scope, "Exchanging federated token");

        let response = client
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "client_credentials"),
                ("scope", scope),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CredentialError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorResponse>(&error_text)
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or(error_text);
            return Err(CredentialError::ExchangeRejected(message));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::ParseError(e.to_string()))?;

        Ok(AccessToken {
            token: token_response.access_token,
            expires_in_secs: token_response.expires_in,
        })
    }
}

fn env_required(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}
