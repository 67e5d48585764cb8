use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use geometry_perceiver::metrics;
use stretch_rtd::{Orchestrator, SlotDescriptor};

use super::output::{emit, OutputFormat};
use super::runtime::{module_config, read_page};

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Measure this page fixture's declared ad units before reporting
    #[arg(long, value_name = "FILE")]
    pub page: Option<PathBuf>,

    /// Module configuration (YAML), used for thresholds
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub async fn cmd_metrics(args: MetricsArgs, format: OutputFormat) -> Result<()> {
    if let Some(path) = &args.page {
        let page = Arc::new(read_page(path).await?);
        let config = module_config(args.config.as_deref())?;
        let slots: Vec<SlotDescriptor> = page
            .declared_slots()
            .into_iter()
            .map(SlotDescriptor::new)
            .collect();
        Orchestrator::new(page.clone(), page, config.thresholds).measure_slots(&slots);
    }
    emit(&metrics::snapshot(), format)
}
