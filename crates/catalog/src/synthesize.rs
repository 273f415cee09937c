use crate::diff::MergeDelta;
use crate::version::{catalog_version, group_signature};
use apilens_protocol::{
    Catalog, DependencyEdge, EndpointCategory, EndpointGroup, CATALOG_SCHEMA_VERSION,
};
use apilens_schema::merge_schemas;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// Service-level facts accompanying a batch of analyzed groups.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub service: String,
    pub base_url: String,
    pub base_urls: Vec<String>,
    pub auth_method: String,
}

/// What `synthesize` hands back: the merged catalog plus the merge verdict.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub catalog: Catalog,
    pub version: String,
    pub diff: String,
    pub changed: bool,
}

fn union_sorted(target: &mut Vec<String>, other: &[String]) {
    let mut set: BTreeSet<String> = target.drain(..).collect();
    set.extend(other.iter().cloned());
    *target = set.into_iter().collect();
}

/// Merge a freshly observed group into its stored counterpart.
fn merge_group(old: &mut EndpointGroup, new: &EndpointGroup) {
    old.example_count += new.example_count;

    for param in &new.path_params {
        match old.path_params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => {
                if existing.example.is_none() {
                    existing.example = param.example.clone();
                }
            }
            None => old.path_params.push(param.clone()),
        }
    }

    union_sorted(&mut old.query_params, &new.query_params);

    old.request_schema = match (old.request_schema.take(), new.request_schema.as_ref()) {
        (Some(a), Some(b)) => Some(merge_schemas(&a, b)),
        (a, b) => b.cloned().or(a),
    };
    old.response_schema = match (old.response_schema.take(), new.response_schema.as_ref()) {
        (Some(a), Some(b)) => Some(merge_schemas(&a, b)),
        (a, b) => b.cloned().or(a),
    };
    if let Some(schema) = &old.response_schema {
        old.response_summary = schema.summary.clone();
    } else if old.response_summary == "empty" {
        old.response_summary = new.response_summary.clone();
    }

    if old.category == EndpointCategory::Other && new.category != EndpointCategory::Other {
        old.category = new.category;
    }

    union_sorted(&mut old.dependencies, &new.dependencies);
    union_sorted(&mut old.produces, &new.produces);
    union_sorted(&mut old.consumes, &new.consumes);
}

/// Union edge sets by `(from, to)`, keeping the strongest confidence.
fn merge_edges(existing: &[DependencyEdge], new: &[DependencyEdge]) -> (Vec<DependencyEdge>, usize) {
    let mut merged: BTreeMap<(String, String), DependencyEdge> = existing
        .iter()
        .map(|e| ((e.from.id(), e.to.id()), e.clone()))
        .collect();

    let mut added = 0usize;
    for edge in new {
        let key = (edge.from.id(), edge.to.id());
        match merged.get_mut(&key) {
            Some(kept) => {
                kept.confidence = kept.confidence.max(edge.confidence);
                kept.has_value_match |= edge.has_value_match;
            }
            None => {
                merged.insert(key, edge.clone());
                added += 1;
            }
        }
    }

    (merged.into_values().collect(), added)
}

/// Merge analyzed groups into an existing catalog (or create one).
///
/// The endpoint union is monotonically non-decreasing: existing endpoints
/// are never deleted because a new run failed to re-observe them. Field
/// information is unioned with the schema inferrer's merge semantics and
/// `example_count` accumulates.
#[must_use]
pub fn synthesize(
    existing: Option<&Catalog>,
    info: &ServiceInfo,
    groups: &[EndpointGroup],
    edges: &[DependencyEdge],
) -> SynthesisOutcome {
    let mut endpoints: BTreeMap<String, EndpointGroup> = existing
        .map(|c| c.endpoints.clone())
        .unwrap_or_default();

    let mut delta = MergeDelta {
        initial: existing.is_none(),
        ..MergeDelta::default()
    };

    for group in groups {
        let id = group.key().id();
        match endpoints.get_mut(&id) {
            Some(old) => {
                let before = group_signature(old);
                merge_group(old, group);
                if group_signature(old) != before {
                    delta.schemas_changed.push(id);
                }
            }
            None => {
                endpoints.insert(id.clone(), group.clone());
                if !delta.initial {
                    delta.endpoints_added.push(id);
                }
            }
        }
    }

    let (merged_edges, edges_added) =
        merge_edges(existing.map(|c| c.edges.as_slice()).unwrap_or(&[]), edges);
    if !delta.initial {
        delta.edges_added = edges_added;
    }
    delta.endpoint_total = endpoints.len();

    let version = catalog_version(&endpoints);
    let changed = match existing {
        None => true,
        Some(prior) => prior.version != version || delta.edges_added > 0,
    };
    let now = Utc::now();

    // A re-analysis that saw no auth evidence must not erase a previously
    // detected method.
    let auth_method = match existing {
        Some(prior) if info.auth_method.starts_with("Unknown") => prior.auth_method.clone(),
        _ => info.auth_method.clone(),
    };

    let mut base_urls: BTreeSet<String> = existing
        .map(|c| c.base_urls.iter().cloned().collect())
        .unwrap_or_default();
    base_urls.extend(info.base_urls.iter().cloned());

    let diff = delta.summary();
    log::info!(
        "Synthesized catalog for {}: {} endpoint(s), version {version} ({diff})",
        info.service,
        endpoints.len()
    );

    let catalog = Catalog {
        schema_version: CATALOG_SCHEMA_VERSION,
        service: existing
            .map(|c| c.service.clone())
            .unwrap_or_else(|| info.service.clone()),
        base_url: existing
            .map(|c| c.base_url.clone())
            .unwrap_or_else(|| info.base_url.clone()),
        base_urls: base_urls.into_iter().collect(),
        auth_method,
        endpoints,
        edges: merged_edges,
        version: version.clone(),
        previous_version: match existing {
            Some(prior) if changed => Some(prior.version.clone()),
            Some(prior) => prior.previous_version.clone(),
            None => None,
        },
        diff_summary: diff.clone(),
        created_at: existing.and_then(|c| c.created_at).or(Some(now)),
        updated_at: if changed {
            Some(now)
        } else {
            existing.and_then(|c| c.updated_at)
        },
    };

    SynthesisOutcome {
        version,
        diff,
        changed,
        catalog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apilens_protocol::{EndpointKey, FieldType, InferredSchema};
    use pretty_assertions::assert_eq;

    fn info() -> ServiceInfo {
        ServiceInfo {
            service: "acme".to_string(),
            base_url: "https://api.acme.com".to_string(),
            base_urls: vec!["https://api.acme.com".to_string()],
            auth_method: "Bearer Token".to_string(),
        }
    }

    fn schema(pairs: &[(&str, FieldType)]) -> InferredSchema {
        InferredSchema {
            fields: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
            summary: format!(
                "object{{{}}}",
                pairs
                    .iter()
                    .map(|(k, _)| *k)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            is_array: false,
            array_length: None,
        }
    }

    fn group(method: &str, path: &str, resp: Option<InferredSchema>) -> EndpointGroup {
        EndpointGroup {
            method: method.to_string(),
            path: path.to_string(),
            category: apilens_protocol::EndpointCategory::Read,
            path_params: Vec::new(),
            query_params: Vec::new(),
            request_schema: None,
            response_schema: resp.clone(),
            response_summary: resp.map(|s| s.summary).unwrap_or_else(|| "empty".to_string()),
            example_count: 1,
            dependencies: Vec::new(),
            produces: Vec::new(),
            consumes: Vec::new(),
        }
    }

    #[test]
    fn initial_synthesis_creates_catalog() {
        let groups = vec![
            group("GET", "/v1/users", Some(schema(&[("id", FieldType::Number)]))),
            group("GET", "/v1/teams", None),
        ];
        let outcome = synthesize(None, &info(), &groups, &[]);

        assert!(outcome.changed);
        assert_eq!(outcome.catalog.endpoint_count(), 2);
        assert_eq!(outcome.diff, "initial catalog: 2 endpoints");
        assert_eq!(outcome.version.len(), 12);
        assert!(outcome.catalog.created_at.is_some());
    }

    #[test]
    fn stable_versioning_on_identical_input() {
        let groups = vec![group(
            "GET",
            "/v1/users",
            Some(schema(&[("id", FieldType::Number)])),
        )];
        let first = synthesize(None, &info(), &groups, &[]);
        let second = synthesize(Some(&first.catalog), &info(), &groups, &[]);

        assert_eq!(second.version, first.version);
        assert!(!second.changed);
        assert_eq!(second.diff, "no changes");
        // Example counts still accumulate without moving the version.
        assert_eq!(second.catalog.example_count(), 2);
    }

    #[test]
    fn subset_reanalysis_never_shrinks_the_catalog() {
        let full = vec![
            group("GET", "/v1/users", None),
            group("GET", "/v1/teams", None),
            group("GET", "/v1/billing", None),
        ];
        let first = synthesize(None, &info(), &full, &[]);
        assert_eq!(first.catalog.endpoint_count(), 3);

        let subset = vec![group("GET", "/v1/users", None)];
        let second = synthesize(Some(&first.catalog), &info(), &subset, &[]);

        assert_eq!(second.catalog.endpoint_count(), 3);
        assert!(!second.changed);
        assert!(second
            .catalog
            .endpoints
            .contains_key("GET /v1/billing"));
    }

    #[test]
    fn schema_union_marks_change_and_mixes_conflicts() {
        let first = synthesize(
            None,
            &info(),
            &[group(
                "GET",
                "/v1/users",
                Some(schema(&[("id", FieldType::Number), ("name", FieldType::String)])),
            )],
            &[],
        );

        let second = synthesize(
            Some(&first.catalog),
            &info(),
            &[group(
                "GET",
                "/v1/users",
                Some(schema(&[("id", FieldType::String), ("email", FieldType::String)])),
            )],
            &[],
        );

        assert!(second.changed);
        assert_ne!(second.version, first.version);
        assert_eq!(second.catalog.previous_version.as_deref(), Some(first.version.as_str()));
        assert_eq!(second.diff, "1 schema changed");

        let merged = &second.catalog.endpoints["GET /v1/users"];
        let fields = &merged.response_schema.as_ref().expect("schema").fields;
        assert_eq!(fields.get("id"), Some(&FieldType::Mixed));
        assert_eq!(fields.get("name"), Some(&FieldType::String));
        assert_eq!(fields.get("email"), Some(&FieldType::String));
    }

    #[test]
    fn new_endpoints_and_edges_reported_in_diff() {
        let first = synthesize(None, &info(), &[group("GET", "/v1/users", None)], &[]);

        let edge = DependencyEdge {
            from: EndpointKey::new("GET", "/v1/users"),
            to: EndpointKey::new("POST", "/v1/tasks"),
            has_value_match: true,
            confidence: 0.7,
        };
        let second = synthesize(
            Some(&first.catalog),
            &info(),
            &[group("POST", "/v1/tasks", None)],
            &[edge],
        );

        assert!(second.changed);
        assert_eq!(
            second.diff,
            "1 endpoint added, 1 dependency edge added"
        );
        assert_eq!(second.catalog.edges.len(), 1);
    }

    #[test]
    fn unknown_auth_never_erases_a_known_method() {
        let first = synthesize(None, &info(), &[group("GET", "/v1/users", None)], &[]);

        let mut anonymous = info();
        anonymous.auth_method = "Unknown (may need login)".to_string();
        let second = synthesize(Some(&first.catalog), &anonymous, &[group("GET", "/v1/users", None)], &[]);

        assert_eq!(second.catalog.auth_method, "Bearer Token");
    }

    #[test]
    fn merge_edges_keeps_strongest() {
        let a = DependencyEdge {
            from: EndpointKey::new("A", "/a"),
            to: EndpointKey::new("B", "/b"),
            has_value_match: true,
            confidence: 0.6,
        };
        let mut b = a.clone();
        b.confidence = 0.9;
        let (merged, added) = merge_edges(&[a], &[b]);
        assert_eq!(added, 0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 0.9);
    }

    #[test]
    fn group_example_counts_accumulate() {
        let first = synthesize(None, &info(), &[group("GET", "/v1/users", None)], &[]);
        let second = synthesize(Some(&first.catalog), &info(), &[group("GET", "/v1/users", None)], &[]);
        let third = synthesize(Some(&second.catalog), &info(), &[group("GET", "/v1/users", None)], &[]);
        let merged: &EndpointGroup = &third.catalog.endpoints["GET /v1/users"];
        assert_eq!(merged.example_count, 3);
    }
}
