use stretch_core_types::{AugmentationConfig, StretchThresholds};

use crate::model::ModuleConfig;

pub const MODULE_NAME: &str = "responsiveStretch";

pub fn default_config() -> ModuleConfig {
    ModuleConfig {
        name: MODULE_NAME.to_string(),
        wait_for_it: false,
        defer_measurement: false,
        params: AugmentationConfig::default(),
        thresholds: StretchThresholds::default(),
    }
}
