use stretch_core_types::{BoundingBox, ElementRef, Viewport};
use tracing::warn;

use crate::errors::LayoutReadError;
use crate::ports::LayoutFrame;

/// Hard stop for ancestor walks on cyclic or corrupted trees.
pub const MAX_ANCESTOR_DEPTH: usize = 4096;

/// Largest coordinate magnitude accepted from the layout, in CSS pixels.
pub const MAX_COORDINATE: f64 = 1.0e9;

/// Raw layout readings for one element, all taken from the same frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySample {
    pub element: ElementRef,
    pub rect: BoundingBox,
    pub viewport: Viewport,
    pub parent: Option<BoundingBox>,
    /// Narrowest in-flow ancestor width; `None` when nothing constrains it.
    pub max_available_width: Option<f64>,
}

impl GeometrySample {
    pub fn capture(frame: &dyn LayoutFrame, element: ElementRef) -> Result<Self, LayoutReadError> {
        let viewport = frame.viewport()?;
        if !viewport.is_finite()
            || viewport.width.abs() > MAX_COORDINATE
            || viewport.height.abs() > MAX_COORDINATE
        {
            return Err(LayoutReadError::malformed(format!(
                "viewport {}x{}",
                viewport.width, viewport.height
            )));
        }

        let rect = checked_box(frame.bounding_box(element)?, element)?;
        let parent = match frame.parent(element)? {
            Some(parent) => Some(checked_box(frame.bounding_box(parent)?, parent)?),
            None => None,
        };
        let max_available_width = narrowest_ancestor_width(frame, element)?;

        Ok(Self {
            element,
            rect,
            viewport,
            parent,
            max_available_width,
        })
    }
}

/// Walk every ancestor below the document root and keep the smallest width
/// among those that constrain normal flow.
pub fn narrowest_ancestor_width(
    frame: &dyn LayoutFrame,
    element: ElementRef,
) -> Result<Option<f64>, LayoutReadError> {
    let mut narrowest: Option<f64> = None;
    let mut current = frame.parent(element)?;
    let mut depth = 0usize;

    while let Some(ancestor) = current {
        if frame.is_document_root(ancestor) {
            break;
        }
        depth += 1;
        if depth > MAX_ANCESTOR_DEPTH {
            warn!(element = %element, depth, "ancestor walk exceeded depth limit");
            return Err(LayoutReadError::malformed(format!(
                "ancestor chain of {element} exceeds {MAX_ANCESTOR_DEPTH} levels"
            )));
        }

        let style = frame.computed_style(ancestor)?;
        if style.constrains_flow() {
            let width = checked_box(frame.bounding_box(ancestor)?, ancestor)?.width;
            narrowest = Some(narrowest.map_or(width, |current: f64| current.min(width)));
        }
        current = frame.parent(ancestor)?;
    }

    Ok(narrowest)
}

fn checked_box(rect: BoundingBox, element: ElementRef) -> Result<BoundingBox, LayoutReadError> {
    if !rect.is_finite() {
        return Err(LayoutReadError::malformed(format!(
            "non-finite bounding box for {element}"
        )));
    }
    let extent = [
        rect.top,
        rect.left,
        rect.right,
        rect.bottom,
        rect.width,
        rect.height,
    ]
    .into_iter()
    .fold(0.0_f64, |acc, value| acc.max(value.abs()));
    if extent > MAX_COORDINATE {
        return Err(LayoutReadError::malformed(format!(
            "bounding box for {element} exceeds {MAX_COORDINATE}px"
        )));
    }
    Ok(rect)
}
