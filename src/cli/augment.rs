use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use stretch_rtd::{BidRequestData, ResponsiveStretchModule};
use tracing::{debug, info};

use super::output::{emit, OutputFormat};
use super::runtime::{module_config, read_json, read_page};

#[derive(Args, Debug)]
pub struct AugmentArgs {
    /// Page fixture (JSON)
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Bid request data (JSON): `adUnits` plus optional `fragments`
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,

    /// Module configuration (YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub async fn cmd_augment(args: AugmentArgs, format: OutputFormat) -> Result<()> {
    let page = Arc::new(read_page(&args.page).await?);
    let mut request: BidRequestData = read_json(&args.request).await?;
    let config = module_config(args.config.as_deref())?;

    let module = ResponsiveStretchModule::new(page.clone(), page);
    module.init(&config);
    let report = module
        .get_bid_request_data(&mut request, &config, || debug!("bid request data ready"))
        .await
        .context("augmenting bid request")?;

    info!(
        measured = ?report.measured,
        missing = ?report.missing,
        failed = ?report.failed,
        "augmentation finished"
    );
    emit(&request.fragments, format)
}
