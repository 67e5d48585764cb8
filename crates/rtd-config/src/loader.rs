use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::defaults::default_config;
use crate::errors::ConfigError;
use crate::model::{ConfigSource, ModuleConfig};
use crate::parse::parse_module_config;

const ENV_PREFIX: &str = "STRETCH_RTD__";
const ENV_JSON: &str = "STRETCH_RTD_OVERRIDE_JSON";

#[derive(Debug, Default)]
pub struct LoadOptions {
    pub paths: Vec<PathBuf>,
    pub include_env: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<ModuleConfig, ConfigError> {
    let mut options = LoadOptions::default();
    if let Some(p) = path {
        options.paths.push(p.to_path_buf());
    }
    options.include_env = true;
    load_config_with_options(&options)
}

/// Layer defaults, YAML files and environment overrides, then parse the
/// result leniently.
pub fn load_config_with_options(options: &LoadOptions) -> Result<ModuleConfig, ConfigError> {
    let mut document = serde_json::to_value(default_config())
        .map_err(|err| ConfigError::Invalid(format!("{}", err)))?;

    for path in &options.paths {
        if path.exists() {
            let overlays = overlays_from_file(path)?;
            apply_overlays(&mut document, overlays);
        } else {
            debug!(path = %path.display(), "config file not found, skipping");
        }
    }

    if options.include_env {
        let overlays = overlays_from_env()?;
        apply_overlays(&mut document, overlays);
    }

    Ok(parse_module_config(&document))
}

struct ConfigOverlay {
    path: Vec<String>,
    value: Value,
    source: ConfigSource,
}

fn apply_overlays(document: &mut Value, overlays: Vec<ConfigOverlay>) {
    for overlay in overlays {
        debug!(
            path = %overlay.path.join("."),
            source = ?overlay.source,
            "applying config overlay"
        );
        set_path(document, &overlay.path, overlay.value);
    }
}

fn set_path(document: &mut Value, path: &[String], value: Value) {
    if path.is_empty() {
        return;
    }
    set_at(document, path, value);
}

/// Non-object nodes on the way are replaced by empty objects.
fn set_at(node: &mut Value, path: &[String], value: Value) {
    let Some((key, rest)) = path.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(key.clone()).or_insert(Value::Null);
        set_at(child, rest, value);
    }
}

fn overlays_from_file(path: &Path) -> Result<Vec<ConfigOverlay>, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|err| ConfigError::Io(format!("{}: {}", path.display(), err)))?;
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|err| ConfigError::Invalid(format!("{}: {}", path.display(), err)))?;
    let json_value = serde_json::to_value(yaml_value)
        .map_err(|err| ConfigError::Invalid(format!("{}: {}", path.display(), err)))?;
    Ok(flatten_value(json_value, Vec::new(), ConfigSource::File))
}

fn overlays_from_env() -> Result<Vec<ConfigOverlay>, ConfigError> {
    let mut overlays = Vec::new();
    for (key, raw) in env::vars() {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            let path = stripped
                .split("__")
                .filter(|segment| !segment.is_empty())
                .map(camel_case)
                .collect::<Vec<_>>();
            if path.is_empty() {
                continue;
            }
            overlays.push(ConfigOverlay {
                path,
                value: parse_env_value(&raw),
                source: ConfigSource::Env,
            });
        }
    }
    // env::vars order is platform dependent
    overlays.sort_by(|a, b| a.path.cmp(&b.path));

    if let Ok(raw_json) = env::var(ENV_JSON) {
        if !raw_json.trim().is_empty() {
            let json_value: Value =
                serde_json::from_str(&raw_json).map_err(|err| ConfigError::InvalidOverride {
                    key: ENV_JSON.to_string(),
                    reason: err.to_string(),
                })?;
            overlays.extend(flatten_value(json_value, Vec::new(), ConfigSource::Env));
        }
    }

    Ok(overlays)
}

/// `INCLUDE_GLOBAL_SCOPE` -> `includeGlobalScope`.
fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (index, word) in segment
        .split('_')
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        let lower = word.to_ascii_lowercase();
        if index == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn parse_env_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        return parsed;
    }
    if let Ok(boolean) = raw.parse::<bool>() {
        return Value::Bool(boolean);
    }
    if let Ok(int_val) = raw.parse::<i64>() {
        return Value::Number(int_val.into());
    }
    Value::String(raw.to_string())
}

/// Objects flatten to one overlay per leaf; arrays and scalars are leaves.
fn flatten_value(value: Value, prefix: Vec<String>, source: ConfigSource) -> Vec<ConfigOverlay> {
    match value {
        Value::Object(map) => {
            let mut result = Vec::new();
            for (key, value) in map {
                let mut next = prefix.clone();
                next.push(key.trim().to_string());
                result.extend(flatten_value(value, next, source));
            }
            result
        }
        other if prefix.is_empty() => {
            debug!(found = %other, "ignoring non-object config document");
            Vec::new()
        }
        other => vec![ConfigOverlay {
            path: prefix,
            value: other,
            source,
        }],
    }
}

#[cfg(test)]
mod unit {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_maps_env_segments() {
        assert_eq!(camel_case("INCLUDE_GLOBAL_SCOPE"), "includeGlobalScope");
        assert_eq!(camel_case("PARAMS"), "params");
        assert_eq!(camel_case("WAIT_FOR_IT"), "waitForIt");
    }

    #[test]
    fn env_values_are_typed() {
        assert_eq!(parse_env_value("false"), json!(false));
        assert_eq!(parse_env_value("250"), json!(250));
        assert_eq!(parse_env_value("[\"a\"]"), json!(["a"]));
        assert_eq!(parse_env_value("bidderA"), json!("bidderA"));
        assert_eq!(parse_env_value(""), Value::Null);
    }

    #[test]
    fn set_path_replaces_leaves_and_builds_parents() {
        let mut doc = json!({"params": {"targetBidders": ["a"]}, "name": 1});
        set_path(&mut doc, &["params".into(), "targetBidders".into()], json!(["b"]));
        set_path(&mut doc, &["name".into(), "inner".into()], json!(true));
        assert_eq!(
            doc,
            json!({"params": {"targetBidders": ["b"]}, "name": {"inner": true}})
        );
    }

    #[test]
    fn set_path_replaces_scalar_root_and_ignores_empty_path() {
        let mut doc = json!("not-an-object");
        set_path(&mut doc, &[], json!(1));
        assert_eq!(doc, json!("not-an-object"));
        set_path(
            &mut doc,
            &["thresholds".into(), "vertical".into(), "high".into()],
            json!(500),
        );
        assert_eq!(doc, json!({"thresholds": {"vertical": {"high": 500}}}));
    }
}
