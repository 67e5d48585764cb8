use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use stretch_rtd::{load_config, ModuleConfig, StaticPage};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    // stdout carries the command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub async fn read_page(path: &Path) -> Result<StaticPage> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading page fixture {}", path.display()))?;
    StaticPage::from_json(&raw).with_context(|| format!("parsing page fixture {}", path.display()))
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn module_config(path: Option<&Path>) -> Result<ModuleConfig> {
    let config = load_config(path).context("loading module config")?;
    if let Some(path) = path {
        info!(path = %path.display(), "Loaded module configuration");
    }
    Ok(config)
}
