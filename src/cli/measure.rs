use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stretch_rtd::{CycleReport, Orchestrator, SlotDescriptor, StretchMeasurement};
use tracing::warn;

use super::output::{emit, OutputFormat};
use super::runtime::{module_config, read_page};

#[derive(Args, Debug)]
pub struct MeasureArgs {
    /// Page fixture (JSON)
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Ad unit code to measure; defaults to every code declared on the page
    #[arg(long = "slot", value_name = "ID")]
    pub slots: Vec<String>,

    /// Module configuration (YAML), used for thresholds
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasureOutput<'a> {
    ad_units: &'a BTreeMap<String, StretchMeasurement>,
    report: &'a CycleReport,
}

pub async fn cmd_measure(args: MeasureArgs, format: OutputFormat) -> Result<()> {
    let page = Arc::new(read_page(&args.page).await?);
    let config = module_config(args.config.as_deref())?;

    let slots = if args.slots.is_empty() {
        page.declared_slots()
    } else {
        args.slots
    };
    if slots.is_empty() {
        warn!(page = %args.page.display(), "page declares no ad units");
    }
    let slots: Vec<SlotDescriptor> = slots.into_iter().map(SlotDescriptor::new).collect();

    let orchestrator = Orchestrator::new(page.clone(), page, config.thresholds);
    let result = orchestrator.measure_slots(&slots);
    emit(
        &MeasureOutput {
            ad_units: &result.measurements,
            report: &result.report,
        },
        format,
    )
}
