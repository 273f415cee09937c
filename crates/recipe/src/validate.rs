//! Static recipe validation, independent of any live data.

use serde_json::Value;

/// Validate authored recipe JSON before persistence.
///
/// Accumulates every violation instead of stopping at the first, so recipe
/// authors see the whole picture in one pass. An empty result means the
/// recipe deserializes cleanly into
/// [`ExtractionRecipe`](apilens_protocol::ExtractionRecipe).
#[must_use]
pub fn validate(recipe: &Value) -> Vec<String> {
    let Some(obj) = recipe.as_object() else {
        return vec!["recipe must be a JSON object".to_string()];
    };
    let mut errors: Vec<String> = Vec::new();

    match obj.get("source") {
        None => errors.push("source is required".to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push("source must not be empty".to_string());
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push("source must be a string path".to_string()),
    }

    match obj.get("fields") {
        None => errors.push("fields is required".to_string()),
        Some(Value::Object(fields)) => {
            if fields.is_empty() {
                errors.push("fields must not be empty".to_string());
            }
            for (name, path) in fields {
                if !path.is_string() {
                    errors.push(format!("fields.{name} must be a string path"));
                }
            }
        }
        Some(_) => errors.push("fields must be an object".to_string()),
    }

    if let Some(filter) = obj.get("filter") {
        match filter.as_object() {
            None => errors.push("filter must be an object".to_string()),
            Some(filter) => {
                match filter.get("field") {
                    Some(Value::String(_)) => {}
                    Some(_) => errors.push("filter.field must be a string".to_string()),
                    None => errors.push("filter.field is required".to_string()),
                }
                let predicates = ["equals", "contains", "one_of"]
                    .iter()
                    .filter(|k| filter.contains_key(**k))
                    .count();
                if predicates != 1 {
                    errors.push(
                        "filter must set exactly one of equals, contains, one_of".to_string(),
                    );
                }
                if let Some(contains) = filter.get("contains") {
                    if !contains.is_string() {
                        errors.push("filter.contains must be a string".to_string());
                    }
                }
                if let Some(one_of) = filter.get("one_of") {
                    if !one_of.is_array() {
                        errors.push("filter.one_of must be an array".to_string());
                    }
                }
            }
        }
    }

    if let Some(require) = obj.get("require") {
        match require.as_array() {
            None => errors.push("require must be an array of field names".to_string()),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(format!("require[{i}] must be a string"));
                    }
                }
            }
        }
    }

    if let Some(compact) = obj.get("compact") {
        if !compact.is_boolean() {
            errors.push("compact must be a boolean".to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use apilens_protocol::ExtractionRecipe;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn valid_recipe_has_no_errors() {
        let recipe = json!({
            "source": "data.items",
            "fields": {"id": "id", "who": "user.name"},
            "filter": {"field": "status", "equals": "open"},
            "require": ["id"],
            "compact": true
        });
        assert_eq!(validate(&recipe), Vec::<String>::new());
        // And it actually deserializes into the typed recipe.
        assert!(serde_json::from_value::<ExtractionRecipe>(recipe).is_ok());
    }

    #[test]
    fn accumulates_all_violations() {
        let recipe = json!({
            "source": 7,
            "fields": {"id": 5},
            "filter": {"field": "status", "equals": "open", "contains": "x"},
            "require": ["ok", 3],
            "compact": "yes"
        });
        let errors = validate(&recipe);
        assert_eq!(
            errors,
            vec![
                "source must be a string path".to_string(),
                "fields.id must be a string path".to_string(),
                "filter must set exactly one of equals, contains, one_of".to_string(),
                "require[1] must be a string".to_string(),
                "compact must be a boolean".to_string(),
            ]
        );
    }

    #[test]
    fn missing_required_keys() {
        let errors = validate(&json!({}));
        assert_eq!(
            errors,
            vec!["source is required".to_string(), "fields is required".to_string()]
        );
    }

    #[test]
    fn non_object_recipe() {
        assert_eq!(
            validate(&json!("nope")),
            vec!["recipe must be a JSON object".to_string()]
        );
    }

    #[test]
    fn filter_without_predicate() {
        let errors = validate(&json!({
            "source": "items",
            "fields": {"id": "id"},
            "filter": {"field": "status"}
        }));
        assert_eq!(
            errors,
            vec!["filter must set exactly one of equals, contains, one_of".to_string()]
        );
    }
}
