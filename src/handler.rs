// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The request-handling pipeline.
//!
//! [`generate_docs`] is the orchestrator for one request: validate the log
//! payload, build the prompt, invoke the engine, persist the artifact, and
//! classify the outcome. Everything it touches comes in through
//! [`AppContext`], constructed once at startup, so tests can substitute
//! doubles per test without process-wide mutation.
//!
//! The pipeline is strictly sequential and does nothing clever: no retries,
//! no internal timeouts, no partial-write recovery. A failed run is re-run
//! wholesale by the scheduler, and the deterministic blob name makes that
//! safe (overwrite, not duplicate).

use tracing::{error, info};

use crate::config::blob_name_for;
use crate::prompt::build_prompt;
use crate::types::{LogPayload, RequestOutcome, SharedEngine, SharedStore};

/// Message returned when the caller submits no usable log text.
pub const NO_LOGS_MESSAGE: &str = "No logs provided";

/// Message returned on a fully successful pipeline run.
pub const SUCCESS_MESSAGE: &str = "Documentation generated and stored successfully";

/// Per-process context handed by reference into every request.
///
/// Read-only after startup; the client handles behind the trait objects are
/// safe for concurrent use.
pub struct AppContext {
    pub engine: SharedEngine,
    pub store: SharedStore,
    /// Injected run identifier; see [`crate::config::AppConfig::run_timestamp`].
    pub run_timestamp: String,
}

impl AppContext {
    /// Create a context from already-configured clients.
    pub fn new(engine: SharedEngine, store: SharedStore, run_timestamp: impl Into<String>) -> Self {
        Self {
            engine,
            store,
            run_timestamp: run_timestamp.into(),
        }
    }
}

/// Run the full pipeline for one log payload.
///
/// Never panics and never returns an error: every failure mode is folded
/// into the [`RequestOutcome`] the HTTP layer serializes.
pub async fn generate_docs(ctx: &AppContext, payload: &LogPayload) -> RequestOutcome {
    if payload.is_empty() {
        // Expected case, not an operational fault; no error-level log.
        return RequestOutcome::client_error(NO_LOGS_MESSAGE);
    }

    let prompt = build_prompt(&payload.logs);

    let document = match ctx.engine.generate(&prompt).await {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, dependency = "engine", "Documentation generation failed");
            return RequestOutcome::server_error(e.to_string());
        }
    };

    info!(
        run_timestamp = %ctx.run_timestamp,
        body_bytes = document.body.len(),
        "Documentation generated"
    );

    let blob_name = blob_name_for(&ctx.run_timestamp);

    let artifact = match ctx.store.put_text(&blob_name, &document.body).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!(error = %e, dependency = "storage", blob = %blob_name, "Artifact upload failed");
            return RequestOutcome::server_error(e.to_string());
        }
    };

    info!(
        blob = %artifact.blob_name,
        container = %artifact.container,
        "Documentation stored"
    );

    RequestOutcome::success(SUCCESS_MESSAGE, artifact.blob_name)
}
