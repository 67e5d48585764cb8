use serde_json::{Map, Value};

/// Merge `src` into `dst`.
///
/// Objects merge key by key, arrays gain the incoming elements they do not
/// already contain, and anything else is replaced by the incoming value.
pub fn deep_merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_obj), Value::Object(src_obj)) => merge_object(dst_obj, src_obj),
        (Value::Array(dst_items), Value::Array(src_items)) => {
            for item in src_items {
                if !dst_items.contains(&item) {
                    dst_items.push(item);
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

pub(crate) fn merge_object(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, value) in src {
        match dst.get_mut(&key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                dst.insert(key, value);
            }
        }
    }
}
