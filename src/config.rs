// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Environment configuration for the opsdoc service.
//!
//! All configuration is read exactly once, at startup, via
//! [`AppConfig::from_env`]. A missing required value fails startup; it never
//! surfaces as a per-request error.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `OPSDOC_RUN_TIMESTAMP` | yes | Identifier for this scheduled run, used to name the artifact |
//! | `OPSDOC_STORAGE_ENDPOINT` | yes | Blob service endpoint, e.g. `https://acct.blob.core.windows.net` |
//! | `OPSDOC_STORAGE_CONTAINER` | yes | Destination container name |
//! | `OPSDOC_STORAGE_SAS` | one of | SAS token authorizing writes to the container |
//! | `OPSDOC_STORAGE_SAS_SECRET` | one of | Vault secret name holding the SAS token |
//! | `OPSDOC_VAULT_URL` | with secret | Vault endpoint, e.g. `https://myvault.vault.azure.net` |
//! | `OPSDOC_ENGINE_BASE_URL` | no | Engine base URL (default `http://localhost:11434/v1`) |
//! | `OPSDOC_MODEL` | no | Model identifier (default `llama3.2`) |
//! | `OPSDOC_ENGINE_API_KEY` | no | Bearer token for the engine, if it wants one |
//! | `OPSDOC_BIND_ADDR` | no | Listen address (default `0.0.0.0:8080`) |
//! | `RUST_LOG` | no | Tracing filter directive |

use std::env;

use crate::error::ConfigError;

/// Default engine base URL (a local Ollama instance).
pub const DEFAULT_ENGINE_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Inference engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Where the storage write credential comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// SAS token supplied directly via environment.
    Sas(String),
    /// Name of a vault secret holding the SAS token.
    VaultSecret(String),
}

/// Object-storage settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub container: String,
    pub credential: CredentialSource,
}

/// Settings needed only when the credential is fetched from the vault.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub vault_url: String,
}

/// Complete startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Externally supplied identifier for this scheduled run. Never generated
    /// internally, so retries of the same run target the same blob name.
    pub run_timestamp: String,
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub vault: Option<VaultConfig>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Fails if any required variable is absent or if neither storage
    /// credential path is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_timestamp = required("OPSDOC_RUN_TIMESTAMP")?;
        let endpoint = trim_trailing_slash(required("OPSDOC_STORAGE_ENDPOINT")?);
        let container = required("OPSDOC_STORAGE_CONTAINER")?;

        let credential = match optional("OPSDOC_STORAGE_SAS") {
            Some(sas) => CredentialSource::Sas(sas),
            None => match optional("OPSDOC_STORAGE_SAS_SECRET") {
                Some(name) => CredentialSource::VaultSecret(name),
                None => return Err(ConfigError::NoStorageCredential),
            },
        };

        // The vault URL is only required when a secret lookup will happen.
        let vault = match credential {
            CredentialSource::VaultSecret(_) => Some(VaultConfig {
                vault_url: trim_trailing_slash(required("OPSDOC_VAULT_URL")?),
            }),
            CredentialSource::Sas(_) => optional("OPSDOC_VAULT_URL")
                .map(|url| VaultConfig {
                    vault_url: trim_trailing_slash(url),
                }),
        };

        let engine = EngineConfig {
            base_url: trim_trailing_slash(
                optional("OPSDOC_ENGINE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ENGINE_BASE_URL.to_string()),
            ),
            model: optional("OPSDOC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: optional("OPSDOC_ENGINE_API_KEY"),
        };

        Ok(Self {
            bind_addr: optional("OPSDOC_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            run_timestamp,
            engine,
            storage: StorageConfig {
                endpoint,
                container,
                credential,
            },
            vault,
        })
    }

    /// The deterministic artifact name for this run.
    pub fn blob_name(&self) -> String {
        blob_name_for(&self.run_timestamp)
    }
}

/// Compute the artifact name for a run timestamp.
///
/// The name is a pure function of the run timestamp, which is what makes a
/// re-invocation of the same scheduled run overwrite instead of duplicate.
pub fn blob_name_for(run_timestamp: &str) -> String {
    format!("devops-doc-{}.txt", run_timestamp)
}

/// Read a required environment variable, rejecting empty values.
fn required(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}

/// Read an optional environment variable, treating empty as absent.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
