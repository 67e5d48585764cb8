use std::sync::Arc;
use std::time::Instant;

use stretch_core_types::{ElementRef, StretchMeasurement, StretchThresholds};
use tracing::{debug, error};

use crate::errors::LayoutReadError;
use crate::metrics;
use crate::model::GeometrySample;
use crate::ports::{LayoutFrame, LayoutReader};
use crate::potential::{axis_room, classify, sanitize};

pub struct GeometryEngine {
    reader: Arc<dyn LayoutReader>,
    thresholds: StretchThresholds,
}

impl GeometryEngine {
    pub fn new(reader: Arc<dyn LayoutReader>) -> Self {
        Self::with_thresholds(reader, StretchThresholds::default())
    }

    /// Inverted threshold pairs fall back to the default for that axis.
    pub fn with_thresholds(reader: Arc<dyn LayoutReader>, thresholds: StretchThresholds) -> Self {
        let thresholds = StretchThresholds {
            horizontal: sanitize(thresholds.horizontal, StretchThresholds::DEFAULT_HORIZONTAL),
            vertical: sanitize(thresholds.vertical, StretchThresholds::DEFAULT_VERTICAL),
        };
        Self { reader, thresholds }
    }

    /// Measure an element. Absent input and layout failures both yield `None`.
    pub fn measure(&self, element: Option<ElementRef>) -> Option<StretchMeasurement> {
        let Some(element) = element else {
            metrics::record_skipped();
            return None;
        };

        let started = Instant::now();
        match self.try_measure(element) {
            Ok(measurement) => {
                metrics::record_measured(started.elapsed());
                debug!(
                    element = %element,
                    width = measurement.width,
                    height = measurement.height,
                    visible = measurement.is_visible,
                    "measured element"
                );
                Some(measurement)
            }
            Err(err) => {
                metrics::record_failed();
                error!(element = %element, error = %err, "failed to read element geometry");
                None
            }
        }
    }

    /// Measure an element, surfacing the layout error.
    pub fn try_measure(&self, element: ElementRef) -> Result<StretchMeasurement, LayoutReadError> {
        let frame = self.reader.freeze()?;
        measure_with(frame.as_ref(), element, &self.thresholds)
    }
}

/// Measure `element` using only reads from `frame`.
pub fn measure_with(
    frame: &dyn LayoutFrame,
    element: ElementRef,
    thresholds: &StretchThresholds,
) -> Result<StretchMeasurement, LayoutReadError> {
    let sample = GeometrySample::capture(frame, element)?;
    Ok(compute_measurement(&sample, thresholds))
}

pub fn compute_measurement(
    sample: &GeometrySample,
    thresholds: &StretchThresholds,
) -> StretchMeasurement {
    let rect = &sample.rect;
    let viewport = &sample.viewport;

    let right_gap = viewport.width - rect.right;
    let bottom_gap = viewport.height - rect.bottom;

    // Intersection with the viewport rectangle only; overlap by other elements is ignored.
    let is_visible = rect.width > 0.0
        && rect.height > 0.0
        && rect.bottom > 0.0
        && rect.right > 0.0
        && rect.top < viewport.height
        && rect.left < viewport.width;

    let stretch_left = round_px(rect.left);
    let stretch_right = round_px(right_gap);
    let stretch_up = round_px(rect.top);
    let stretch_down = round_px(bottom_gap);

    let stretch_potential = classify(
        axis_room(stretch_left, stretch_right),
        axis_room(stretch_up, stretch_down),
        thresholds,
    );

    StretchMeasurement {
        width: round_px(rect.width),
        height: round_px(rect.height),
        top: stretch_up,
        left: stretch_left,
        right: stretch_right,
        bottom: stretch_down,
        stretch_left,
        stretch_right,
        stretch_up,
        stretch_down,
        max_width: round_px(viewport.width),
        max_height: round_px(viewport.height),
        total_available_width: round_px(rect.width + rect.left + right_gap),
        total_available_height: round_px(rect.height + rect.top + bottom_gap),
        viewport_width: round_px(viewport.width),
        viewport_height: round_px(viewport.height),
        is_visible,
        viewport_width_percentage: percentage(rect.width, viewport.width),
        viewport_height_percentage: percentage(rect.height, viewport.height),
        parent_width: sample.parent.map(|parent| round_px(parent.width)),
        parent_height: sample.parent.map(|parent| round_px(parent.height)),
        max_available_width: sample.max_available_width.map(round_px),
        stretch_potential,
    }
}

/// Round half up to a whole pixel (`-0.5` becomes `0`).
pub fn round_px(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Share of `whole` in percent; 0 when `whole` is not positive.
fn percentage(part: f64, whole: f64) -> i64 {
    if whole > 0.0 {
        round_px(part / whole * 100.0)
    } else {
        0
    }
}
