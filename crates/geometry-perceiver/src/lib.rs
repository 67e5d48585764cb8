//! Geometry perceiver: measures ad slot elements against the viewport.
//!
//! All reads for one measurement go through a single [`LayoutFrame`]
//! obtained from [`LayoutReader::freeze`], so scrolling or reflow between
//! reads cannot produce inconsistent numbers.

pub mod engine;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod potential;

pub use engine::{compute_measurement, measure_with, round_px, GeometryEngine};
pub use errors::LayoutReadError;
pub use model::{GeometrySample, MAX_ANCESTOR_DEPTH, MAX_COORDINATE};
pub use ports::{LayoutFrame, LayoutReader};
pub use potential::classify;
