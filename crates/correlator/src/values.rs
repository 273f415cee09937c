//! Scalar value harvesting from JSON bodies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

/// Recursion bound for body walks.
const MAX_DEPTH: usize = 6;

/// How many array elements are scanned per level. List → detail flows are
/// the common case, so this is deliberately more than the schema inferrer's
/// first-element sampling.
const MAX_ARRAY_SCAN: usize = 10;

/// Total values harvested per body.
pub const MAX_VALUES_PER_BODY: usize = 200;

/// Values too generic to be identifiers.
static STOPWORDS: Lazy<HashSet<&str>> = Lazy::new(|| {
    [
        "true", "false", "null", "none", "ok", "success", "error", "active", "inactive",
        "enabled", "disabled", "pending", "unknown", "default", "asc", "desc",
    ]
    .iter()
    .copied()
    .collect()
});

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("static regex")
});

/// One scalar observed in a body, with the field path it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedValue {
    /// Dot path with `[]` markers (`items[].id`), empty for a bare scalar
    pub path: String,
    pub value: String,
}

/// How identifier-like a value is, in `(0, 0.4]`.
///
/// Longer and more unique values weigh higher; short numeric ids are the
/// weakest signal that still counts.
#[must_use]
pub fn value_specificity(value: &str) -> f32 {
    if UUID_RE.is_match(value) {
        return 0.4;
    }
    if value.len() >= 16 {
        return 0.3;
    }
    if value.len() >= 8 {
        return 0.2;
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return 0.05;
    }
    0.15
}

fn keep_string(s: &str) -> bool {
    let len = s.len();
    if !(3..=128).contains(&len) {
        return false;
    }
    if STOPWORDS.contains(s.to_lowercase().as_str()) {
        return false;
    }
    // Identifier-ish only: no whitespace.
    !s.contains(char::is_whitespace)
}

fn keep_number(raw: &str) -> bool {
    // Tiny integers (ids 1, 2, page numbers) match everything and carry no
    // signal.
    raw.len() >= 3 && raw.bytes().all(|b| b.is_ascii_digit())
}

fn push(values: &mut Vec<HarvestedValue>, path: &str, value: String) {
    if values.len() < MAX_VALUES_PER_BODY {
        values.push(HarvestedValue {
            path: path.to_string(),
            value,
        });
    }
}

fn walk(value: &Value, path: &str, depth: usize, out: &mut Vec<HarvestedValue>) {
    if depth >= MAX_DEPTH || out.len() >= MAX_VALUES_PER_BODY {
        return;
    }
    match value {
        Value::String(s) => {
            if keep_string(s) {
                push(out, path, s.clone());
            }
        }
        Value::Number(n) => {
            let raw = n.to_string();
            if keep_number(&raw) {
                push(out, path, raw);
            }
        }
        Value::Object(obj) => {
            for (key, child) in obj {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(child, &child_path, depth + 1, out);
            }
        }
        Value::Array(items) => {
            let elem_path = format!("{path}[]");
            for item in items.iter().take(MAX_ARRAY_SCAN) {
                walk(item, &elem_path, depth + 1, out);
            }
        }
        Value::Bool(_) | Value::Null => {}
    }
}

/// Harvest identifier-like scalars from a JSON body text.
///
/// Unparseable bodies yield an empty list — the caller treats them as
/// opaque.
#[must_use]
pub fn harvest_values(body: Option<&str>) -> Vec<HarvestedValue> {
    let Some(text) = body else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    walk(&value, "", 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn harvests_nested_and_array_values() {
        let body = r#"{"project":{"id":"p_123"},"items":[{"id":"a_1x9"},{"id":"b_2y8"}],"ok":true}"#;
        let values = harvest_values(Some(body));
        let paths: Vec<&str> = values.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"project.id"));
        assert!(paths.contains(&"items[].id"));
        // Booleans and stopwords never harvest.
        assert!(!values.iter().any(|v| v.value == "true"));
    }

    #[test]
    fn filters_noise_values() {
        let body = r#"{"a":"ok","b":"x","c":1,"d":42,"e":100,"f":"has space in it"}"#;
        let values = harvest_values(Some(body));
        assert_eq!(
            values,
            vec![HarvestedValue {
                path: "e".to_string(),
                value: "100".to_string()
            }]
        );
    }

    #[test]
    fn unparseable_body_is_empty() {
        assert!(harvest_values(Some("<html>")).is_empty());
        assert!(harvest_values(None).is_empty());
    }

    #[test]
    fn specificity_ordering() {
        let uuid = value_specificity("550e8400-e29b-41d4-a716-446655440000");
        let long = value_specificity("tok_abcdef0123456789");
        let medium = value_specificity("p_123456");
        let mixed = value_specificity("p_123");
        let numeric = value_specificity("123");
        assert!(uuid > long);
        assert!(long > medium);
        assert!(medium > mixed);
        assert!(mixed > numeric);
        assert!(numeric > 0.0);
    }
}
