// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing setup for the opsdoc service.
//!
//! Structured logs go to stdout where the cluster's log collector picks them
//! up; the external telemetry backend consumes that stream, so no exporter
//! runs in-process. `RUST_LOG` takes precedence over the configured default
//! level.

use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default log level if `RUST_LOG` is not set.
    pub default_level: Level,

    /// Whether to use ANSI colors (off for collected container logs).
    pub ansi_colors: bool,

    /// Whether to include the target module path.
    pub include_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            ansi_colors: false,
            include_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Config for local development with colored debug output.
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            ansi_colors: true,
            include_target: true,
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }
}

/// Initialize the tracing subscriber once at startup.
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}", config.default_level)));

    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}
