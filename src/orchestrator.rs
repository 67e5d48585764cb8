use std::collections::BTreeMap;
use std::sync::Arc;

use fragment_merger::{merge_now, AugmentationTree};
use geometry_perceiver::{GeometryEngine, LayoutReader};
use serde::Serialize;
use slot_locator::{ElementLocator, ElementLookup};
use stretch_core_types::{
    AugmentationConfig, SlotDescriptor, StretchMeasurement, StretchThresholds,
};
use tracing::{debug, info, warn};

use crate::errors::RtdError;

/// Slot ids of one cycle grouped by outcome, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub measured: Vec<String>,
    /// No element matched the slot id.
    pub missing: Vec<String>,
    /// An element matched but its geometry could not be read.
    pub failed: Vec<String>,
}

impl CycleReport {
    pub fn total(&self) -> usize {
        self.measured.len() + self.missing.len() + self.failed.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SlotMeasurements {
    pub measurements: BTreeMap<String, StretchMeasurement>,
    pub report: CycleReport,
}

/// Locates and measures slots, then hands the results to the merger.
pub struct Orchestrator {
    locator: ElementLocator,
    engine: GeometryEngine,
}

impl Orchestrator {
    pub fn new(
        lookup: Arc<dyn ElementLookup>,
        reader: Arc<dyn LayoutReader>,
        thresholds: StretchThresholds,
    ) -> Self {
        Self {
            locator: ElementLocator::new(lookup),
            engine: GeometryEngine::with_thresholds(reader, thresholds),
        }
    }

    /// Measure every slot. A slot id listed twice is measured once.
    pub fn measure_slots(&self, slots: &[SlotDescriptor]) -> SlotMeasurements {
        let mut out = SlotMeasurements::default();
        for slot in slots {
            let id = slot.id.as_str();
            if out.measurements.contains_key(id)
                || out.report.missing.iter().any(|known| known == id)
                || out.report.failed.iter().any(|known| known == id)
            {
                debug!(slot = %id, "duplicate slot id, skipping");
                continue;
            }

            let Some(element) = self.locator.locate(id) else {
                warn!(slot = %id, "no element found for ad unit");
                out.report.missing.push(id.to_string());
                continue;
            };

            match self.engine.measure(Some(element)) {
                Some(measurement) => {
                    out.report.measured.push(id.to_string());
                    out.measurements.insert(id.to_string(), measurement);
                }
                None => out.report.failed.push(id.to_string()),
            }
        }
        out
    }

    /// One full cycle: measure, then merge once into `tree`.
    pub fn run_cycle(
        &self,
        slots: &[SlotDescriptor],
        tree: &mut AugmentationTree,
        config: &AugmentationConfig,
    ) -> Result<CycleReport, RtdError> {
        if slots.is_empty() {
            warn!("no ad units to measure");
            return Ok(CycleReport::default());
        }

        let SlotMeasurements {
            measurements,
            report,
        } = self.measure_slots(slots);

        if measurements.is_empty() {
            warn!(
                missing = report.missing.len(),
                failed = report.failed.len(),
                "no ad unit could be measured"
            );
            return Ok(report);
        }

        merge_now(tree, &measurements, config)?;
        info!(
            measured = report.measured.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            bidders = config.target_bidders.len(),
            "stretch cycle complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use serde_json::json;

    fn page() -> Arc<StaticPage> {
        Arc::new(
            StaticPage::from_value(json!({
                "viewport": {"width": 1000.0, "height": 800.0},
                "root": 1,
                "elements": [
                    {"node": 1, "rect": {"x": 0.0, "y": 0.0, "width": 1000.0, "height": 2000.0}},
                    {"node": 5, "parent": 1, "id": "main",
                     "rect": {"x": 50.0, "y": 0.0, "width": 800.0, "height": 2000.0}},
                    {"node": 2, "parent": 5, "id": "ad-1",
                     "rect": {"x": 100.0, "y": 100.0, "width": 300.0, "height": 250.0}},
                    {"node": 3, "parent": 4, "id": "ad-loop",
                     "rect": {"x": 0.0, "y": 0.0, "width": 300.0, "height": 250.0}},
                    {"node": 4, "parent": 3, "rect": {"x": 0.0, "y": 0.0, "width": 400.0, "height": 400.0}}
                ]
            }))
            .unwrap(),
        )
    }

    fn orchestrator() -> Orchestrator {
        let page = page();
        Orchestrator::new(page.clone(), page, StretchThresholds::default())
    }

    #[test]
    fn outcomes_are_reported_per_slot() {
        let result = orchestrator().measure_slots(&[
            SlotDescriptor::new("ad-1"),
            SlotDescriptor::new("ad-missing"),
            SlotDescriptor::new("ad-loop"),
            SlotDescriptor::new("ad-1"),
        ]);
        assert_eq!(result.report.measured, vec!["ad-1"]);
        assert_eq!(result.report.missing, vec!["ad-missing"]);
        assert_eq!(result.report.failed, vec!["ad-loop"]);
        assert_eq!(result.measurements.len(), 1);
        assert_eq!(result.measurements["ad-1"].stretch_left, 100);
        assert_eq!(result.measurements["ad-1"].max_available_width, Some(800));
        assert_eq!(result.measurements["ad-1"].parent_width, Some(800));
    }

    #[test]
    fn empty_input_leaves_tree_untouched() {
        let mut tree = AugmentationTree::new();
        let report = orchestrator()
            .run_cycle(&[], &mut tree, &AugmentationConfig::default())
            .unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(tree, AugmentationTree::new());
    }

    #[test]
    fn unresolvable_slots_skip_merge() {
        let mut tree = AugmentationTree::new();
        let report = orchestrator()
            .run_cycle(
                &[SlotDescriptor::new("nope")],
                &mut tree,
                &AugmentationConfig::default(),
            )
            .unwrap();
        assert_eq!(report.missing, vec!["nope"]);
        assert_eq!(tree, AugmentationTree::new());
    }
}
