use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative field-mapping rule applied to a response body at query time.
///
/// Recipes are plain structured data authored by users or agents; no
/// executable code. `apilens_recipe::validate` is the only gate before
/// persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ExtractionRecipe {
    /// Dot/bracket path into the body that must resolve to an array of
    /// objects (`data.items`, `results[0].rows`)
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<RecipeFilter>,

    /// Field names every item must carry to survive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<Vec<String>>,

    /// Output name → source path within each item
    pub fields: BTreeMap<String, String>,

    /// Drop output fields whose resolved value is absent
    #[serde(default)]
    pub compact: bool,
}

/// Item predicate on a named field. Exactly one of the predicate forms is
/// set; `validate` rejects recipes that set none or several.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct RecipeFilter {
    pub field: String,

    /// Keep items whose field equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<serde_json::Value>,

    /// Keep items whose string field contains this substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    /// Keep items whose field is a member of this set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<serde_json::Value>>,
}

impl RecipeFilter {
    /// Number of predicate forms set on this filter.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        usize::from(self.equals.is_some())
            + usize::from(self.contains.is_some())
            + usize::from(self.one_of.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filter_predicate_count() {
        let filter = RecipeFilter {
            field: "status".to_string(),
            equals: Some(serde_json::json!("open")),
            contains: None,
            one_of: None,
        };
        assert_eq!(filter.predicate_count(), 1);
    }

    #[test]
    fn recipe_roundtrip_defaults() {
        let json = r#"{"source":"data.items","fields":{"id":"id"}}"#;
        let recipe: ExtractionRecipe = serde_json::from_str(json).expect("deserialize");
        assert!(!recipe.compact);
        assert!(recipe.filter.is_none());
        assert!(recipe.require.is_none());
    }
}
