use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

pub fn emit<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("serializing output as json")?
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("serializing output as yaml")?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
