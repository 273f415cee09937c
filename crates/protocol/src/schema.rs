use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inferred JSON field type.
///
/// `Mixed` marks a field whose type disagreed across independently observed
/// samples; it signals genuine polymorphism to downstream consumers instead
/// of silently picking one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    Mixed,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Mixed => "mixed",
        }
    }
}

/// Compact structural shape of one JSON body.
///
/// Field paths use dot notation with `[]` markers for array descent
/// (`items[].id`). Depth and width caps bound the map size regardless of
/// input size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema, Default)]
pub struct InferredSchema {
    /// Flattened field path → type map
    pub fields: BTreeMap<String, FieldType>,

    /// Human/machine-readable shape string (`object{id,name,+3}`)
    pub summary: String,

    /// Whether the top-level value was an array
    pub is_array: bool,

    /// Top-level array length, when `is_array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_length: Option<usize>,
}

impl InferredSchema {
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// One field whose type changed between two observations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct TypeChange {
    pub path: String,
    pub was: FieldType,
    pub now: FieldType,
}

/// Structural diff between two observations of the same endpoint's shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema, Default)]
pub struct DriftResult {
    pub drifted: bool,
    #[serde(default)]
    pub added_fields: Vec<String>,
    #[serde(default)]
    pub removed_fields: Vec<String>,
    #[serde(default)]
    pub type_changes: Vec<TypeChange>,
}

impl DriftResult {
    /// Total number of structural differences.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added_fields.len() + self.removed_fields.len() + self.type_changes.len()
    }
}
