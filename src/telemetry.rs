//! Structured logging setup.
//!
//! Uses `tracing` + `tracing-subscriber` with environment-based filtering.
//! The configured level is the default; `RUST_LOG` overrides it when set, so
//! operators can raise verbosity without touching configuration files.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Settings;

/// Initialize the global tracing subscriber from application settings.
///
/// Safe to call once per process; returns an error if a subscriber is
/// already installed.
pub fn init_from_settings(settings: &Settings) -> anyhow::Result<()> {
    init(&settings.application.log_level)
}

/// Initialize the global tracing subscriber with a default level directive.
pub fn init(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(())
}
