pub mod augment;
pub mod measure;
pub mod metrics;
pub mod output;
pub mod runtime;

pub use augment::{cmd_augment, AugmentArgs};
pub use measure::{cmd_measure, MeasureArgs};
pub use metrics::{cmd_metrics, MetricsArgs};
pub use output::OutputFormat;
pub use runtime::init_logging;
