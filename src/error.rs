// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the opsdoc service.
//!
//! Each external dependency gets its own strongly-typed error enum, defined
//! with `thiserror`, so the request handler can branch exhaustively on which
//! dependency failed. `anyhow` is used only at the binary boundary for
//! startup wiring.

use thiserror::Error;

/// Errors from the LLM inference engine client.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Engine API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Response parsing error: {0}")]
    ParseError(String),
}

impl EngineError {
    /// Create an API error with status code.
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        Self::ApiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Check if this error is retryable by a future scheduled run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }
}

/// Errors from the object-storage client.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage authentication failed: {0}")]
    AuthError(String),

    #[error("Storage API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl StorageError {
    /// Create an API error with status code.
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        Self::ApiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Errors while resolving the workload identity or vault secrets.
///
/// These only occur during startup; any of them is fatal.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Federated token file unreadable: {0}")]
    TokenFileUnreadable(String),

    #[error("Token exchange rejected: {0}")]
    ExchangeRejected(String),

    #[error("Secret not found in vault: {0}")]
    SecretNotFound(String),

    #[error("Vault API error: {message}")]
    VaultError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Response parsing error: {0}")]
    ParseError(String),
}

impl CredentialError {
    /// Create a vault API error with status code.
    pub fn vault(message: impl Into<String>, status_code: u16) -> Self {
        Self::VaultError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Errors during environment configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("No storage credential configured: set OPSDOC_STORAGE_SAS or OPSDOC_STORAGE_SAS_SECRET")]
    NoStorageCredential,
}

/// Result type alias using anyhow for flexible error handling in startup code.
pub type Result<T> = anyhow::Result<T>;
