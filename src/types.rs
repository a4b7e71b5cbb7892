// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core types for the opsdoc service.
//!
//! This module defines the data that flows through one request: the submitted
//! log payload, the generated document, the stored artifact record, and the
//! API-facing outcome. It also defines the two trait seams ([`DocEngine`] and
//! [`ArtifactStore`]) that let tests substitute doubles for the inference
//! engine and the object store without process-wide mutation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{EngineError, StorageError};

// ============================================================================
// Request / Document Types
// ============================================================================

/// Raw CI/CD log text submitted by a caller.
///
/// Lives only for the duration of one request. Empty content (after trim)
/// is rejected by the request handler before anything downstream runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPayload {
    #[serde(default)]
    pub logs: String,
}

impl LogPayload {
    /// Create a payload from raw log text.
    pub fn new(logs: impl Into<String>) -> Self {
        Self { logs: logs.into() }
    }

    /// Check whether the payload carries any usable log text.
    pub fn is_empty(&self) -> bool {
        self.logs.trim().is_empty()
    }
}

/// The model's textual output for one generation call.
///
/// A successful engine call with an empty body is still a success; that is
/// the engine's own contract, not something this service second-guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub body: String,
}

impl GeneratedDocument {
    /// Create a document from generated text.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// Record of one persisted artifact.
///
/// Created by the store at upload time and never mutated afterwards.
/// Retention and deletion belong to the storage service, not to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Object name within the container, e.g. `devops-doc-20240101-000000.txt`.
    pub blob_name: String,
    /// Destination container identifier.
    pub container: String,
}

// ============================================================================
// Outcome Types
// ============================================================================

/// Classification of a request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Documentation was generated and stored.
    Success,
    /// The caller's input was rejected (empty logs).
    ClientError,
    /// A downstream dependency (engine or storage) failed.
    ServerError,
}

/// The API-facing result of one pipeline run.
///
/// Constructed exactly once per request and never persisted.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub status: OutcomeStatus,
    pub message: String,
    pub blob_name: Option<String>,
}

impl RequestOutcome {
    /// A successful run that stored the named artifact.
    pub fn success(message: impl Into<String>, blob_name: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
            blob_name: Some(blob_name.into()),
        }
    }

    /// Input rejected at the handler boundary.
    pub fn client_error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::ClientError,
            message: message.into(),
            blob_name: None,
        }
    }

    /// A downstream failure surfaced to the caller.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::ServerError,
            message: message.into(),
            blob_name: None,
        }
    }

    /// Check whether this outcome represents success.
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

// ============================================================================
// Trait Seams
// ============================================================================

/// Chat-completion engine seam.
///
/// The production implementation is [`crate::engine::EngineClient`]; tests
/// substitute mocks to assert call counts and failure isolation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocEngine: Send + Sync {
    /// Send one prompt to the engine and return the reply content.
    async fn generate(&self, prompt: &str) -> Result<GeneratedDocument, EngineError>;
}

/// Object-store seam.
///
/// The production implementation is [`crate::storage::BlobStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload `body` as a text object named `blob_name`, overwriting any
    /// existing object of the same name.
    async fn put_text(&self, blob_name: &str, body: &str) -> Result<StoredArtifact, StorageError>;
}

/// Shared engine handle, read-only after startup.
pub type SharedEngine = Arc<dyn DocEngine>;

/// Shared store handle, read-only after startup.
pub type SharedStore = Arc<dyn ArtifactStore>;
