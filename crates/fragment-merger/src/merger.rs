use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use stretch_core_types::{AugmentationConfig, StretchMeasurement};
use tracing::debug;

use crate::errors::MergeError;
use crate::tree::AugmentationTree;

pub const RESPONSIVE_STRETCH_KEY: &str = "responsiveStretch";

const SITE_DATA_PATH: [&str; 3] = ["site", "ext", "data"];
const IMP_DATA_PATH: [&str; 2] = ["ext", "data"];

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PayloadViewport {
    pub width: i64,
    pub height: i64,
}

/// Site-level payload shared by the global and bidder scopes.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StretchPayload<'a> {
    pub viewport: PayloadViewport,
    pub ad_units: &'a BTreeMap<String, StretchMeasurement>,
    /// Capture instant in epoch milliseconds.
    pub timestamp: i64,
}

impl<'a> StretchPayload<'a> {
    /// `None` when there is nothing to report.
    pub fn new(
        measurements: &'a BTreeMap<String, StretchMeasurement>,
        captured_at: DateTime<Utc>,
    ) -> Option<Self> {
        let first = measurements.values().next()?;
        Some(Self {
            viewport: PayloadViewport {
                width: first.viewport_width,
                height: first.viewport_height,
            },
            ad_units: measurements,
            timestamp: captured_at.timestamp_millis(),
        })
    }

    fn to_patch(&self) -> Result<Value, MergeError> {
        Ok(keyed(serde_json::to_value(self)?))
    }
}

fn keyed(value: Value) -> Value {
    let mut patch = Map::new();
    patch.insert(RESPONSIVE_STRETCH_KEY.to_string(), value);
    Value::Object(patch)
}

/// Merge one cycle's measurements into `target` according to `config`.
///
/// An empty measurement map leaves the tree untouched.
pub fn merge(
    target: &mut AugmentationTree,
    measurements: &BTreeMap<String, StretchMeasurement>,
    config: &AugmentationConfig,
    captured_at: DateTime<Utc>,
) -> Result<(), MergeError> {
    let Some(payload) = StretchPayload::new(measurements, captured_at) else {
        debug!("no measurements to merge");
        return Ok(());
    };

    if config.include_global_scope || !config.target_bidders.is_empty() {
        let patch = payload.to_patch()?;

        if config.include_global_scope && config.target_bidders.is_empty() {
            target.merge_global(&SITE_DATA_PATH, patch.clone())?;
            debug!(slots = measurements.len(), "merged global stretch payload");
        }

        for bidder in &config.target_bidders {
            target.merge_bidder(bidder, &SITE_DATA_PATH, patch.clone())?;
            debug!(bidder = %bidder, slots = measurements.len(), "merged bidder stretch payload");
        }
    }

    if config.include_impression_scope {
        for (slot, measurement) in measurements {
            target.merge_imp(slot, &IMP_DATA_PATH, keyed(serde_json::to_value(measurement)?))?;
        }
        debug!(slots = measurements.len(), "merged impression stretch data");
    }

    Ok(())
}

/// [`merge`] stamped with the current time.
pub fn merge_now(
    target: &mut AugmentationTree,
    measurements: &BTreeMap<String, StretchMeasurement>,
    config: &AugmentationConfig,
) -> Result<(), MergeError> {
    merge(target, measurements, config, Utc::now())
}
