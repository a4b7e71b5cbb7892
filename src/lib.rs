// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! opsdoc - CI/CD log documentation service.
//!
//! Accepts CI/CD log text over HTTP, asks a locally hosted chat-completion
//! engine to turn it into structured deployment documentation, and persists
//! the result as a blob artifact named after the scheduled run. Designed to
//! run unattended inside a cluster job runner, authenticating to cloud
//! services with a workload identity instead of static secrets.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`types`] - Core data types and the `DocEngine` / `ArtifactStore` seams
//! - [`error`] - Per-dependency error types
//! - [`config`] - Startup configuration from the environment
//! - [`prompt`] - Pure prompt construction
//! - [`engine`] - OpenAI-compatible chat-completion client
//! - [`storage`] - Blob container writer
//! - [`identity`] - Workload identity token exchange
//! - [`vault`] - Vault secret accessor
//! - [`handler`] - The per-request pipeline
//! - [`server`] - actix-web routes
//! - [`telemetry`] - Tracing initialization
//!
//! # Pipeline
//!
//! ```text
//! POST /generate-docs
//!   └─ handler::generate_docs
//!        ├─ prompt::build_prompt          (pure)
//!        ├─ engine .generate(prompt)      (LLM call)
//!        └─ store  .put_text(name, body)  (blob upload)
//! ```
//!
//! Credentials and secrets are resolved once at startup; the request path
//! never talks to the vault or the token authority.

pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod identity;
pub mod prompt;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod vault;

// Re-export commonly used types at crate root
pub use error::{ConfigError, CredentialError, EngineError, Result, StorageError};
pub use handler::{generate_docs, AppContext};
pub use types::{
    ArtifactStore, DocEngine, GeneratedDocument, LogPayload, OutcomeStatus, RequestOutcome,
    SharedEngine, SharedStore, StoredArtifact,
};

/// opsdoc version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
