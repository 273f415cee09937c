use crate::infer::infer;
use apilens_protocol::{DriftResult, FieldType, InferredSchema, TypeChange};
use serde_json::Value;
use std::collections::BTreeMap;

/// Union field maps from independently observed samples.
///
/// A path whose type disagrees across samples becomes `mixed` — a deliberate
/// escape hatch signaling genuine polymorphism to downstream consumers
/// instead of silently picking one side.
#[must_use]
pub fn merge_field_maps<'a, I>(maps: I) -> BTreeMap<String, FieldType>
where
    I: IntoIterator<Item = &'a BTreeMap<String, FieldType>>,
{
    let mut merged: BTreeMap<String, FieldType> = BTreeMap::new();
    for map in maps {
        for (path, ty) in map {
            merged
                .entry(path.clone())
                .and_modify(|existing| {
                    if *existing != *ty {
                        *existing = FieldType::Mixed;
                    }
                })
                .or_insert(*ty);
        }
    }
    merged
}

/// Merge two schemas observed for the same endpoint.
///
/// Field maps are unioned with `mixed` on disagreement; the top-level shape
/// flag keeps the first observation; the summary keeps whichever side carries
/// more fields (the more informative one).
#[must_use]
pub fn merge_schemas(existing: &InferredSchema, new: &InferredSchema) -> InferredSchema {
    let fields = merge_field_maps([&existing.fields, &new.fields]);
    let summary = if new.field_count() > existing.field_count() {
        new.summary.clone()
    } else {
        existing.summary.clone()
    };
    InferredSchema {
        fields,
        summary,
        is_array: existing.is_array,
        array_length: new.array_length.or(existing.array_length),
    }
}

/// Diff a stored schema against a freshly observed sample.
///
/// Paths present only in the new sample are `added_fields`, present only in
/// the stored schema are `removed_fields`, present in both with differing
/// types are `type_changes`. A stored `mixed` type matches anything.
#[must_use]
pub fn detect_drift(existing: &InferredSchema, new_sample: &Value) -> DriftResult {
    let new_schema = infer(new_sample);

    let mut added_fields = Vec::new();
    let mut removed_fields = Vec::new();
    let mut type_changes = Vec::new();

    for (path, new_ty) in &new_schema.fields {
        match existing.fields.get(path) {
            None => added_fields.push(path.clone()),
            Some(&FieldType::Mixed) => {}
            Some(old_ty) if old_ty != new_ty => type_changes.push(TypeChange {
                path: path.clone(),
                was: *old_ty,
                now: *new_ty,
            }),
            Some(_) => {}
        }
    }
    for path in existing.fields.keys() {
        if !new_schema.fields.contains_key(path) {
            removed_fields.push(path.clone());
        }
    }

    let drifted =
        !added_fields.is_empty() || !removed_fields.is_empty() || !type_changes.is_empty();

    DriftResult {
        drifted,
        added_fields,
        removed_fields,
        type_changes,
    }
}
