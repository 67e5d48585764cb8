use serde_json::{Map, Value};
use stretch_core_types::{AugmentationConfig, AxisThresholds, StretchThresholds};
use tracing::warn;

use crate::defaults::default_config;
use crate::model::ModuleConfig;

/// Build a [`ModuleConfig`] from host-supplied JSON.
///
/// Never fails: a field of the wrong type is logged and replaced by its
/// default, unknown fields are ignored, and `null` counts as absent.
pub fn parse_module_config(raw: &Value) -> ModuleConfig {
    let mut config = default_config();
    let Some(map) = as_object(raw, "<root>") else {
        return config;
    };

    if let Some(name) = string_field(map, "name") {
        config.name = name;
    }
    if let Some(wait) = bool_field(map, "waitForIt") {
        config.wait_for_it = wait;
    }
    if let Some(defer) = bool_field(map, "deferMeasurement") {
        config.defer_measurement = defer;
    }
    if let Some(params) = field(map, "params").and_then(|value| as_object(value, "params")) {
        config.params = parse_params(params);
    }
    if let Some(thresholds) =
        field(map, "thresholds").and_then(|value| as_object(value, "thresholds"))
    {
        config.thresholds = parse_thresholds(thresholds);
    }
    config
}

fn parse_params(map: &Map<String, Value>) -> AugmentationConfig {
    let mut params = AugmentationConfig::default();
    match field(map, "targetBidders") {
        None => {}
        Some(Value::Array(items)) => {
            for item in items {
                match item.as_str() {
                    Some(bidder) => {
                        params.target_bidders.insert(bidder.to_string());
                    }
                    None => warn!(entry = %item, "dropping non-string entry in params.targetBidders"),
                }
            }
        }
        Some(other) => warn!(
            found = kind(other),
            "params.targetBidders should be an array, using default"
        ),
    }
    if let Some(global) = bool_field(map, "includeGlobalScope") {
        params.include_global_scope = global;
    }
    if let Some(imp) = bool_field(map, "includeImpressionScope") {
        params.include_impression_scope = imp;
    }
    params
}

fn parse_thresholds(map: &Map<String, Value>) -> StretchThresholds {
    StretchThresholds {
        horizontal: parse_axis(map, "horizontal", StretchThresholds::DEFAULT_HORIZONTAL),
        vertical: parse_axis(map, "vertical", StretchThresholds::DEFAULT_VERTICAL),
    }
}

fn parse_axis(map: &Map<String, Value>, axis: &str, fallback: AxisThresholds) -> AxisThresholds {
    let Some(entry) = field(map, axis) else {
        return fallback;
    };
    let label = format!("thresholds.{axis}");
    let Some(entry) = as_object(entry, &label) else {
        return fallback;
    };
    let medium = pixel_field(entry, &label, "medium").unwrap_or(fallback.medium);
    let high = pixel_field(entry, &label, "high").unwrap_or(fallback.high);
    let parsed = AxisThresholds::new(medium, high);
    if parsed.is_ordered() {
        parsed
    } else {
        warn!(
            axis,
            medium,
            high,
            "medium threshold above high threshold, using defaults"
        );
        fallback
    }
}

fn pixel_field(map: &Map<String, Value>, label: &str, key: &str) -> Option<u32> {
    let value = field(map, key)?;
    match value.as_u64().and_then(|px| u32::try_from(px).ok()) {
        Some(px) => Some(px),
        None => {
            warn!(field = %format!("{label}.{key}"), found = %value, "expected a pixel count, using default");
            None
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = field(map, key)?;
    match value.as_str() {
        Some(text) => Some(text.to_string()),
        None => {
            warn!(field = key, found = kind(value), "expected a string, using default");
            None
        }
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = field(map, key)?;
    match value.as_bool() {
        Some(flag) => Some(flag),
        None => {
            warn!(field = key, found = kind(value), "expected a boolean, using default");
            None
        }
    }
}

fn field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn as_object<'a>(value: &'a Value, label: &str) -> Option<&'a Map<String, Value>> {
    let map = value.as_object();
    if map.is_none() && !value.is_null() {
        warn!(field = label, found = kind(value), "expected an object, using defaults");
    }
    map
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
