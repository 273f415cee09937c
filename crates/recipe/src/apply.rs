use crate::path::resolve_path;
use apilens_protocol::{ExtractionRecipe, RecipeFilter};
use serde_json::{Map, Value};

fn filter_keeps(item: &Value, filter: &RecipeFilter) -> bool {
    let Some(value) = resolve_path(item, &filter.field) else {
        return false;
    };
    if let Some(expected) = &filter.equals {
        return value == expected;
    }
    if let Some(needle) = &filter.contains {
        return value
            .as_str()
            .map(|s| s.contains(needle.as_str()))
            .unwrap_or(false);
    }
    if let Some(set) = &filter.one_of {
        return set.contains(value);
    }
    // A filter with no predicate keeps everything; `validate` rejects such
    // recipes before they are persisted.
    true
}

fn has_required(item: &Value, require: &[String]) -> bool {
    require.iter().all(|field| {
        resolve_path(item, field)
            .map(|v| !v.is_null())
            .unwrap_or(false)
    })
}

/// Apply a recipe to a response body.
///
/// Returns `None` when the recipe does not apply — the source path misses
/// or resolves to something other than an array — so the caller can fall
/// back to the raw body. Non-object items are dropped; an empty result
/// array is still a successful application.
#[must_use]
pub fn apply(body: &Value, recipe: &ExtractionRecipe) -> Option<Value> {
    let source = resolve_path(body, &recipe.source)?;
    let items = source.as_array()?;

    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            continue;
        }
        if let Some(filter) = &recipe.filter {
            if !filter_keeps(item, filter) {
                continue;
            }
        }
        if let Some(require) = &recipe.require {
            if !has_required(item, require) {
                continue;
            }
        }

        let mut mapped = Map::new();
        for (output_name, source_path) in &recipe.fields {
            match resolve_path(item, source_path) {
                Some(value) => {
                    mapped.insert(output_name.clone(), value.clone());
                }
                None if recipe.compact => {}
                None => {
                    mapped.insert(output_name.clone(), Value::Null);
                }
            }
        }
        out.push(Value::Object(mapped));
    }

    Some(Value::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn recipe(source: &str, fields: &[(&str, &str)]) -> ExtractionRecipe {
        ExtractionRecipe {
            source: source.to_string(),
            filter: None,
            require: None,
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
            compact: false,
        }
    }

    fn body() -> Value {
        json!({"data":{"items":[
            {"id":"a","user":{"name":"Ada"},"status":"open"},
            {"id":"b","user":{"name":"Bob"},"status":"closed"},
            {"id":"c","status":"open"}
        ]}})
    }

    #[test]
    fn maps_fields_from_nested_paths() {
        let recipe = recipe("data.items", &[("id", "id"), ("who", "user.name")]);
        let result = apply(&body(), &recipe).expect("applies");
        assert_eq!(
            result,
            json!([
                {"id":"a","who":"Ada"},
                {"id":"b","who":"Bob"},
                {"id":"c","who":null}
            ])
        );
    }

    #[test]
    fn compact_drops_absent_fields() {
        let mut r = recipe("data.items", &[("id", "id"), ("who", "user.name")]);
        r.compact = true;
        let result = apply(&body(), &r).expect("applies");
        assert_eq!(result[2], json!({"id":"c"}));
    }

    #[test]
    fn filter_and_require_narrow_items() {
        let mut r = recipe("data.items", &[("id", "id")]);
        r.filter = Some(RecipeFilter {
            field: "status".to_string(),
            equals: Some(json!("open")),
            contains: None,
            one_of: None,
        });
        r.require = Some(vec!["user.name".to_string()]);
        let result = apply(&body(), &r).expect("applies");
        // "b" fails the filter, "c" fails require.
        assert_eq!(result, json!([{"id":"a"}]));
    }

    #[test]
    fn inapplicable_recipes_return_none_never_panic() {
        let r = recipe("data.missing", &[("id", "id")]);
        assert_eq!(apply(&body(), &r), None);

        // Source resolves to an object, not an array.
        let r = recipe("data", &[("id", "id")]);
        assert_eq!(apply(&body(), &r), None);

        // Scalar array: items are dropped, result is empty but applied.
        let r = recipe("nums", &[("id", "id")]);
        assert_eq!(apply(&json!({"nums":[1,2,3]}), &r), Some(json!([])));
    }

    #[test]
    fn one_of_membership_filter() {
        let mut r = recipe("data.items", &[("id", "id")]);
        r.filter = Some(RecipeFilter {
            field: "id".to_string(),
            equals: None,
            contains: None,
            one_of: Some(vec![json!("a"), json!("c")]),
        });
        let result = apply(&body(), &r).expect("applies");
        assert_eq!(result, json!([{"id":"a"},{"id":"c"}]));
    }
}
