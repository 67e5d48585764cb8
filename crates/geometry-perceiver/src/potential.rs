//! Stretch potential buckets.
//!
//! Free room on an axis is the sum of the non-negative gaps on both sides.
//! Each axis is bucketed with its own [`AxisThresholds`]; more room never
//! yields a lower bucket.

use stretch_core_types::{AxisThresholds, StretchPotential, StretchThresholds};

pub fn classify(
    horizontal_room: i64,
    vertical_room: i64,
    thresholds: &StretchThresholds,
) -> StretchPotential {
    StretchPotential {
        horizontal: thresholds.horizontal.classify(horizontal_room),
        vertical: thresholds.vertical.classify(vertical_room),
    }
}

/// Room on one axis from the gaps on its two sides.
pub fn axis_room(before: i64, after: i64) -> i64 {
    before.max(0).saturating_add(after.max(0))
}

/// Replace an unordered threshold pair with the fallback.
pub fn sanitize(axis: AxisThresholds, fallback: AxisThresholds) -> AxisThresholds {
    if axis.is_ordered() {
        axis
    } else {
        fallback
    }
}
