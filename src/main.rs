// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! opsdoc entry point - startup wiring and the HTTP server.
//!
//! Startup order matters: telemetry first so configuration failures are
//! visible, then configuration, then credential/secret resolution, then
//! client construction. Any failure before the listener binds exits the
//! process non-zero; the service never accepts requests without a usable
//! storage credential.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use opsdoc::config::{AppConfig, CredentialSource};
use opsdoc::engine::EngineClient;
use opsdoc::handler::AppContext;
use opsdoc::identity::WorkloadIdentity;
use opsdoc::server;
use opsdoc::storage::BlobStore;
use opsdoc::telemetry::{init_telemetry, TelemetryConfig};
use opsdoc::vault::VaultClient;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry(&TelemetryConfig::default()).context("failed to initialize telemetry")?;

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Credential resolution happens exactly once, before the listener binds.
    let sas_token = match &config.storage.credential {
        CredentialSource::Sas(sas) => sas.clone(),
        CredentialSource::VaultSecret(secret_name) => {
            let vault_config = config
                .vault
                .as_ref()
                .context("vault configuration missing for secret-based credential")?;

            let identity = WorkloadIdentity::from_env().context("workload identity unavailable")?;
            let vault = VaultClient::connect(&vault_config.vault_url, &identity)
                .await
                .context("vault authentication failed")?;

            info!(secret = %secret_name, "Resolving storage credential from vault");
            vault
                .get_secret(secret_name)
                .await
                .context("storage credential secret lookup failed")?
        }
    };

    let engine = EngineClient::new(&config.engine).context("failed to build engine client")?;
    let store = BlobStore::new(
        &config.storage.endpoint,
        &config.storage.container,
        sas_token,
    )
    .context("failed to build storage client")?;

    let ctx = web::Data::new(AppContext::new(
        Arc::new(engine),
        Arc::new(store),
        config.run_timestamp.clone(),
    ));

    info!(
        bind_addr = %config.bind_addr,
        model = %config.engine.model,
        container = %config.storage.container,
        run_timestamp = %config.run_timestamp,
        "Starting opsdoc"
    );

    HttpServer::new(move || App::new().app_data(ctx.clone()).configure(server::configure))
        .bind(&config.bind_addr)
        .with_context(|| format!("failed to bind {}", config.bind_addr))?
        .run()
        .await?;

    Ok(())
}
