use std::sync::Arc;

use stretch_core_types::{BoundingBox, ComputedStyle, ElementRef, Viewport};

use crate::errors::LayoutReadError;

/// Host capability for reading layout.
pub trait LayoutReader: Send + Sync {
    /// Capture a view of the layout that stays consistent for its lifetime.
    fn freeze(&self) -> Result<Arc<dyn LayoutFrame>, LayoutReadError>;
}

/// One consistent layout snapshot.
pub trait LayoutFrame: Send + Sync {
    fn viewport(&self) -> Result<Viewport, LayoutReadError>;

    fn bounding_box(&self, element: ElementRef) -> Result<BoundingBox, LayoutReadError>;

    fn computed_style(&self, element: ElementRef) -> Result<ComputedStyle, LayoutReadError>;

    /// Containing element, or `None` for the root and detached elements.
    fn parent(&self, element: ElementRef) -> Result<Option<ElementRef>, LayoutReadError>;

    fn is_document_root(&self, element: ElementRef) -> bool;
}
