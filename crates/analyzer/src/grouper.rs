use crate::category::categorize;
use apilens_correlator::DependencyGraph;
use apilens_normalizer::normalize;
use apilens_protocol::{EndpointGroup, Exchange, InferredSchema, PathParam};
use apilens_schema::{detect_drift, infer, infer_body, merge_schemas};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

struct GroupAccumulator {
    method: String,
    path: String,
    path_params: Vec<PathParam>,
    query_params: BTreeSet<String>,
    request_schema: Option<InferredSchema>,
    response_schema: Option<InferredSchema>,
    saw_response_body: bool,
    example_count: u32,
}

fn fold_schema(existing: Option<InferredSchema>, new: Option<InferredSchema>) -> Option<InferredSchema> {
    match (existing, new) {
        (Some(old), Some(fresh)) => Some(merge_schemas(&old, &fresh)),
        (old, fresh) => fresh.or(old),
    }
}

/// Collapse exchanges sharing `(method, normalized path)` into endpoint
/// groups, sorted by key.
///
/// Path parameters come from the normalizer; the first concrete example per
/// parameter wins. Schemas are merged across samples with `mixed` on type
/// disagreement. Dependency facts are attached from the correlator's graph.
#[must_use]
pub fn group_exchanges(exchanges: &[Exchange], graph: &DependencyGraph) -> Vec<EndpointGroup> {
    let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();

    for exchange in exchanges {
        let norm = normalize(&exchange.path);
        let id = format!("{} {}", exchange.method, norm.path);

        let acc = groups.entry(id).or_insert_with(|| GroupAccumulator {
            method: exchange.method.clone(),
            path: norm.path.clone(),
            path_params: norm.params.clone(),
            query_params: BTreeSet::new(),
            request_schema: None,
            response_schema: None,
            saw_response_body: false,
            example_count: 0,
        });

        for (name, _) in &exchange.query {
            acc.query_params.insert(name.clone());
        }

        acc.request_schema = fold_schema(
            acc.request_schema.take(),
            infer_body(exchange.request_body.as_deref()),
        );

        let response_value: Option<Value> = exchange
            .response_body
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .and_then(|t| serde_json::from_str(t).ok());
        if let (Some(stored), Some(value)) = (&acc.response_schema, &response_value) {
            let drift = detect_drift(stored, value);
            if drift.drifted {
                log::debug!(
                    "response drift on {} {}: {} structural change(s) across samples",
                    exchange.method,
                    norm.path,
                    drift.change_count()
                );
            }
        }
        acc.response_schema = fold_schema(
            acc.response_schema.take(),
            response_value.as_ref().map(infer),
        );
        acc.saw_response_body |= exchange
            .response_body
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        acc.example_count += 1;
    }

    groups
        .into_values()
        .map(|acc| {
            let response_summary = match &acc.response_schema {
                Some(schema) => schema.summary.clone(),
                None if acc.saw_response_body => "unparseable".to_string(),
                None => "empty".to_string(),
            };
            let category = categorize(&acc.method, &acc.path);
            let mut group = EndpointGroup {
                method: acc.method,
                path: acc.path,
                category,
                path_params: acc.path_params,
                query_params: acc.query_params.into_iter().collect(),
                request_schema: acc.request_schema,
                response_schema: acc.response_schema,
                response_summary,
                example_count: acc.example_count,
                dependencies: Vec::new(),
                produces: Vec::new(),
                consumes: Vec::new(),
            };
            let key = group.key();
            group.dependencies = graph.dependencies_of(&key);
            group.produces = graph.produces_for(&key);
            group.consumes = graph.consumes_for(&key);
            group
        })
        .collect()
}
