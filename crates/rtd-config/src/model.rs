use serde::{Deserialize, Serialize};
use stretch_core_types::{AugmentationConfig, StretchThresholds};

/// Effective configuration for one registration of the module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub name: String,
    /// Whether the host auction should wait for this module before starting.
    pub wait_for_it: bool,
    /// Defer the measurement pass by one scheduling tick.
    pub defer_measurement: bool,
    pub params: AugmentationConfig,
    pub thresholds: StretchThresholds,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        crate::defaults::default_config()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Env,
}
