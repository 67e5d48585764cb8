//! Responsive stretch real-time data module.
//!
//! Measures how much room surrounds each ad slot on a rendered page and
//! writes the measurements into the global, bidder and impression fragments
//! of an outgoing bid request.

pub mod errors;
pub mod module;
pub mod orchestrator;
pub mod page;

pub use errors::RtdError;
pub use module::{BidRequestData, ResponsiveStretchModule};
pub use orchestrator::{CycleReport, Orchestrator, SlotMeasurements};
pub use page::{PageFixture, StaticPage};

pub use fragment_merger::AugmentationTree;
pub use stretch_core_types::{AugmentationConfig, SlotDescriptor, StretchMeasurement};
pub use stretch_rtd_config::{default_config, load_config, parse_module_config, ModuleConfig};
