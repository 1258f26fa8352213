pub mod api;
pub mod catalog;
pub mod config;
pub mod gold;
pub mod log;
pub mod pricing;
pub mod providers;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::AppState;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::gold::GoldPriceCache;
use crate::providers::MetalsLiveProvider;

/// Builds the application state from a config: catalog, oracle client, and
/// the TTL cache wired between them.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load_from_path(path)?,
        None => Catalog::builtin()?,
    };
    info!("Loaded catalog with {} products", catalog.len());

    let oracle = MetalsLiveProvider::new(
        &config.oracle.base_url,
        Duration::from_secs(config.oracle.timeout_secs),
    )?;

    Ok(AppState {
        catalog: Arc::new(catalog),
        gold: Arc::new(GoldPriceCache::new(oracle)),
    })
}

/// Loads config, binds the listener, and serves until shutdown.
pub async fn run(config_path: Option<&str>, port_override: Option<u16>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    if let Some(port) = port_override {
        config.server.port = port;
    }

    let state = build_state(&config)?;
    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
