use apilens_protocol::{FieldType, InferredSchema};
use serde_json::Value;
use std::collections::BTreeMap;

/// Hard cap on object/array recursion depth.
pub const MAX_DEPTH: usize = 6;

/// Hard cap on fields recorded per object level.
pub const MAX_FIELDS_PER_LEVEL: usize = 25;

/// How many keys a summary shows before truncating with `+N`.
const SUMMARY_KEYS: usize = 5;

/// Common field names sorted to the front of each level so the most useful
/// fields survive width truncation. Order within this list is preserved.
const PRIORITY_FIELDS: &[&str] = &[
    "id", "uuid", "key", "name", "title", "type", "status", "state", "email", "url", "slug",
    "created_at", "updated_at", "count", "total", "data", "items", "results", "error", "message",
    "code",
];

/// Map one JSON value to its field type.
#[must_use]
pub fn value_type(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::Null,
        Value::Bool(_) => FieldType::Bool,
        Value::Number(_) => FieldType::Number,
        Value::String(_) => FieldType::String,
        Value::Array(_) => FieldType::Array,
        Value::Object(_) => FieldType::Object,
    }
}

/// Object keys with priority fields first, the rest in map order, capped.
fn level_keys(obj: &serde_json::Map<String, Value>, cap: usize) -> Vec<&String> {
    let mut ordered: Vec<&String> = Vec::with_capacity(obj.len().min(cap));
    for priority in PRIORITY_FIELDS {
        if let Some((key, _)) = obj.get_key_value(*priority) {
            ordered.push(key);
        }
    }
    for key in obj.keys() {
        if !PRIORITY_FIELDS.contains(&key.as_str()) {
            ordered.push(key);
        }
    }
    ordered.truncate(cap);
    ordered
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn walk(value: &Value, prefix: &str, depth: usize, fields: &mut BTreeMap<String, FieldType>) {
    if depth >= MAX_DEPTH {
        return;
    }
    match value {
        Value::Object(obj) => {
            for key in level_keys(obj, MAX_FIELDS_PER_LEVEL) {
                let child = &obj[key];
                let path = join_path(prefix, key);
                fields.insert(path.clone(), value_type(child));
                match child {
                    Value::Object(_) | Value::Array(_) => walk(child, &path, depth + 1, fields),
                    _ => {}
                }
            }
        }
        Value::Array(items) => {
            // First element only; homogeneity is assumed.
            if let Some(first) = items.first() {
                let path = format!("{prefix}[]");
                fields.insert(path.clone(), value_type(first));
                match first {
                    Value::Object(_) | Value::Array(_) => walk(first, &path, depth + 1, fields),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// Render a compact shape string for one JSON value.
///
/// Objects render as `object{k1,k2,+N}` with priority keys first, arrays as
/// `array[len]<itemShape>`, scalars as their type name.
#[must_use]
pub fn summarize(value: &Value) -> String {
    summarize_at(value, 0)
}

fn summarize_at(value: &Value, depth: usize) -> String {
    match value {
        Value::Object(obj) => {
            let keys = level_keys(obj, SUMMARY_KEYS);
            let shown: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
            let hidden = obj.len().saturating_sub(shown.len());
            if hidden > 0 {
                format!("object{{{},+{hidden}}}", shown.join(","))
            } else {
                format!("object{{{}}}", shown.join(","))
            }
        }
        Value::Array(items) => match items.first() {
            Some(first) if depth < 3 => {
                format!("array[{}]<{}>", items.len(), summarize_at(first, depth + 1))
            }
            Some(_) => format!("array[{}]", items.len()),
            None => "array[0]".to_string(),
        },
        other => value_type(other).as_str().to_string(),
    }
}

/// Infer a compact schema from one JSON value.
#[must_use]
pub fn infer(value: &Value) -> InferredSchema {
    let mut fields = BTreeMap::new();
    walk(value, "", 0, &mut fields);

    let (is_array, array_length) = match value {
        Value::Array(items) => (true, Some(items.len())),
        _ => (false, None),
    };

    InferredSchema {
        fields,
        summary: summarize(value),
        is_array,
        array_length,
    }
}

/// Infer a schema from a raw body text.
///
/// Returns `None` when the body is absent, empty, or not parseable JSON;
/// the caller treats such bodies as opaque text. This function never fails.
#[must_use]
pub fn infer_body(body: Option<&str>) -> Option<InferredSchema> {
    let text = body?.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(infer(&value)),
        Err(err) => {
            log::debug!("unparseable body ({} bytes): {err}", text.len());
            None
        }
    }
}
