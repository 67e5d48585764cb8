//! Real-time data submodule facade.
//!
//! Mirrors the registration surface an auction host expects from an RTD
//! submodule: a name, an `init` hook and a per-auction
//! `get_bid_request_data` hook that must signal completion exactly once.

use std::sync::Arc;

use fragment_merger::AugmentationTree;
use geometry_perceiver::LayoutReader;
use serde::{Deserialize, Serialize};
use slot_locator::ElementLookup;
use stretch_core_types::SlotDescriptor;
use stretch_rtd_config::ModuleConfig;
use tracing::{debug, info, warn};

use crate::errors::RtdError;
use crate::orchestrator::{CycleReport, Orchestrator};

/// The part of a bid request a cycle reads and augments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRequestData {
    #[serde(default)]
    pub ad_units: Vec<SlotDescriptor>,
    #[serde(default)]
    pub fragments: AugmentationTree,
}

/// Fires the wrapped callback when dropped.
struct CompletionGuard<F: FnOnce()> {
    done: Option<F>,
}

impl<F: FnOnce()> CompletionGuard<F> {
    fn new(done: F) -> Self {
        Self { done: Some(done) }
    }
}

impl<F: FnOnce()> Drop for CompletionGuard<F> {
    fn drop(&mut self) {
        if let Some(done) = self.done.take() {
            done();
        }
    }
}

#[derive(Clone)]
pub struct ResponsiveStretchModule {
    lookup: Arc<dyn ElementLookup>,
    reader: Arc<dyn LayoutReader>,
}

impl ResponsiveStretchModule {
    pub const NAME: &'static str = "responsiveStretch";

    pub fn new(lookup: Arc<dyn ElementLookup>, reader: Arc<dyn LayoutReader>) -> Self {
        Self { lookup, reader }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Always available; logs the effective configuration.
    pub fn init(&self, config: &ModuleConfig) -> bool {
        if config.name != Self::NAME {
            warn!(configured = %config.name, expected = Self::NAME, "module registered under a different name");
        }
        info!(
            bidders = config.params.target_bidders.len(),
            global = config.params.include_global_scope,
            impression = config.params.include_impression_scope,
            defer = config.defer_measurement,
            "responsive stretch module initialised"
        );
        true
    }

    /// Measure every ad unit and merge the results into `request.fragments`.
    ///
    /// `done` runs exactly once, after the merge, whatever the outcome. A
    /// malformed fragment is returned as an error once `done` has run.
    pub async fn get_bid_request_data<F>(
        &self,
        request: &mut BidRequestData,
        config: &ModuleConfig,
        done: F,
    ) -> Result<CycleReport, RtdError>
    where
        F: FnOnce(),
    {
        let guard = CompletionGuard::new(done);

        if config.defer_measurement {
            debug!("deferring measurement by one tick");
            tokio::task::yield_now().await;
        }

        let orchestrator = Orchestrator::new(
            self.lookup.clone(),
            self.reader.clone(),
            config.thresholds,
        );
        let result = orchestrator.run_cycle(
            &request.ad_units,
            &mut request.fragments,
            &config.params,
        );
        drop(guard);
        result
    }
}
