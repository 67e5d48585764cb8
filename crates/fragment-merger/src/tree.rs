use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{MergeError, Scope};
use crate::merge::deep_merge;

/// Request fragments a cycle may augment.
///
/// `global` and each `bidder` entry are OpenRTB-shaped request objects;
/// `imp` holds one impression object per slot id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentationTree {
    #[serde(default)]
    pub global: Value,
    #[serde(default)]
    pub bidder: BTreeMap<String, Value>,
    #[serde(default)]
    pub imp: BTreeMap<String, Value>,
}

impl AugmentationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only lookup of a dotted path inside the global fragment.
    pub fn global_at(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.global, path)
    }

    pub fn bidder_at(&self, bidder: &str, path: &[&str]) -> Option<&Value> {
        self.bidder.get(bidder).and_then(|root| lookup(root, path))
    }

    pub fn imp_at(&self, slot: &str, path: &[&str]) -> Option<&Value> {
        self.imp.get(slot).and_then(|root| lookup(root, path))
    }

    pub(crate) fn merge_global(&mut self, path: &[&str], patch: Value) -> Result<(), MergeError> {
        merge_at(&mut self.global, path, patch, Scope::Global)
    }

    pub(crate) fn merge_bidder(
        &mut self,
        bidder: &str,
        path: &[&str],
        patch: Value,
    ) -> Result<(), MergeError> {
        let root = self.bidder.entry(bidder.to_string()).or_insert(Value::Null);
        merge_at(root, path, patch, Scope::Bidder(bidder.to_string()))
    }

    pub(crate) fn merge_imp(
        &mut self,
        slot: &str,
        path: &[&str],
        patch: Value,
    ) -> Result<(), MergeError> {
        let root = self.imp.entry(slot.to_string()).or_insert(Value::Null);
        merge_at(root, path, patch, Scope::Impression(slot.to_string()))
    }
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

/// Deep-merge `patch` into the object found at `path`, creating missing
/// objects on the way. Existing non-object nodes on the path are an error.
fn merge_at(root: &mut Value, path: &[&str], patch: Value, scope: Scope) -> Result<(), MergeError> {
    let mut node = root;
    let mut walked: Vec<&str> = Vec::with_capacity(path.len());
    for key in path {
        let map = as_object(node, &walked, &scope)?;
        walked.push(*key);
        node = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_object(node, &walked, &scope)?;
    deep_merge(node, patch);
    Ok(())
}

fn as_object<'a>(
    node: &'a mut Value,
    walked: &[&str],
    scope: &Scope,
) -> Result<&'a mut Map<String, Value>, MergeError> {
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    let found = kind(node);
    node.as_object_mut()
        .ok_or_else(|| MergeError::MalformedTarget {
            scope: scope.clone(),
            path: if walked.is_empty() {
                "<root>".to_string()
            } else {
                walked.join(".")
            },
            found,
        })
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creates_missing_path() {
        let mut tree = AugmentationTree::new();
        tree.merge_global(&["site", "ext", "data"], json!({"k": 1}))
            .unwrap();
        assert_eq!(tree.global, json!({"site": {"ext": {"data": {"k": 1}}}}));
        assert_eq!(tree.global_at(&["site", "ext", "data", "k"]), Some(&json!(1)));
    }

    #[test]
    fn keeps_unrelated_content() {
        let mut tree = AugmentationTree {
            global: json!({"site": {"page": "https://example.com", "ext": {"data": {"other": true}}}}),
            ..AugmentationTree::default()
        };
        tree.merge_global(&["site", "ext", "data"], json!({"k": 1}))
            .unwrap();
        assert_eq!(
            tree.global,
            json!({"site": {"page": "https://example.com", "ext": {"data": {"other": true, "k": 1}}}})
        );
    }

    #[test]
    fn scalar_on_path_is_malformed() {
        let mut tree = AugmentationTree {
            global: json!({"site": {"ext": "oops"}}),
            ..AugmentationTree::default()
        };
        let err = tree
            .merge_global(&["site", "ext", "data"], json!({}))
            .unwrap_err();
        match err {
            MergeError::MalformedTarget { scope, path, found } => {
                assert_eq!(scope, Scope::Global);
                assert_eq!(path, "site.ext");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_root_is_malformed() {
        let mut tree = AugmentationTree::new();
        tree.imp.insert("ad-1".to_string(), json!([1, 2]));
        let err = tree.merge_imp("ad-1", &["ext", "data"], json!({})).unwrap_err();
        assert!(err.to_string().contains("imp:ad-1"));
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn bidder_fragments_are_independent() {
        let mut tree = AugmentationTree::new();
        tree.merge_bidder("a", &["site"], json!({"x": 1})).unwrap();
        tree.merge_bidder("b", &["site"], json!({"x": 2})).unwrap();
        assert_eq!(tree.bidder_at("a", &["site", "x"]), Some(&json!(1)));
        assert_eq!(tree.bidder_at("b", &["site", "x"]), Some(&json!(2)));
        assert!(tree.global.is_null());
    }
}
