use crate::graph::{DependencyGraph, EdgeInfo};
use crate::values::{harvest_values, value_specificity};
use apilens_normalizer::normalize;
use apilens_protocol::{EndpointKey, Exchange};
use std::collections::{HashMap, HashSet};

/// Minimum confidence an edge needs to enter the DAG at all.
const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// Base confidence for any exact value match.
const MATCH_BASE: f32 = 0.5;

/// Confidence added per additional supporting exchange pair.
const SUPPORT_STEP: f32 = 0.05;
const SUPPORT_CAP: u32 = 4;

/// Dependency correlator over a time-ordered exchange sequence.
///
/// Exchanges are expected in capture order (the ingestor guarantees this);
/// only earlier → later value flows are considered.
#[derive(Debug, Clone)]
pub struct Correlator {
    /// Edges below this confidence are omitted entirely rather than stored
    /// with near-zero weight.
    pub min_confidence: f32,
}

impl Default for Correlator {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

struct Annotated {
    key: EndpointKey,
    /// Response scalars: (field path, value)
    produced: Vec<(String, String)>,
    /// Request-side locations: value → location labels
    request_index: HashMap<String, Vec<String>>,
}

fn request_index(exchange: &Exchange) -> HashMap<String, Vec<String>> {
    let mut index: HashMap<String, Vec<String>> = HashMap::new();
    for segment in exchange.path.split('/').filter(|s| !s.is_empty()) {
        index
            .entry(segment.to_string())
            .or_default()
            .push("path".to_string());
    }
    for (name, value) in &exchange.query {
        index
            .entry(value.clone())
            .or_default()
            .push(format!("query:{name}"));
    }
    for harvested in harvest_values(exchange.request_body.as_deref()) {
        index
            .entry(harvested.value)
            .or_default()
            .push(format!("body:{}", harvested.path));
    }
    index
}

#[derive(Debug, Default)]
struct EdgeEvidence {
    best_specificity: f32,
    pairs: HashSet<(usize, usize)>,
    /// (produced field path, consuming location)
    flows: Vec<(String, String)>,
}

impl Correlator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer the dependency DAG from a time-ordered exchange sequence.
    ///
    /// Absence of any matching value is the normal case and yields an empty
    /// graph.
    #[must_use]
    pub fn correlate(&self, exchanges: &[Exchange]) -> DependencyGraph {
        let annotated: Vec<Annotated> = exchanges
            .iter()
            .map(|exchange| Annotated {
                key: EndpointKey::new(
                    exchange.method.clone(),
                    normalize(&exchange.path).path,
                ),
                produced: harvest_values(exchange.response_body.as_deref())
                    .into_iter()
                    .map(|hv| (hv.path, hv.value))
                    .collect(),
                request_index: request_index(exchange),
            })
            .collect();

        let mut evidence: HashMap<(String, String), EdgeEvidence> = HashMap::new();
        let mut keys: HashMap<String, EndpointKey> = HashMap::new();
        for a in &annotated {
            keys.entry(a.key.id()).or_insert_with(|| a.key.clone());
        }

        for (i, earlier) in annotated.iter().enumerate() {
            if earlier.produced.is_empty() {
                continue;
            }
            for (j, later) in annotated.iter().enumerate().skip(i + 1) {
                // Repeated identical calls must never correlate with
                // themselves.
                if earlier.key == later.key {
                    continue;
                }
                for (field_path, value) in &earlier.produced {
                    let Some(locations) = later.request_index.get(value) else {
                        continue;
                    };
                    let entry = evidence
                        .entry((earlier.key.id(), later.key.id()))
                        .or_default();
                    entry.best_specificity = entry.best_specificity.max(value_specificity(value));
                    entry.pairs.insert((i, j));
                    for location in locations {
                        entry.flows.push((field_path.clone(), location.clone()));
                    }
                }
            }
        }

        let mut graph = DependencyGraph::new();
        for a in &annotated {
            graph.ensure_node(&a.key);
        }

        for ((from_id, to_id), ev) in &evidence {
            let support = ev.pairs.len() as u32;
            let extra = support.saturating_sub(1).min(SUPPORT_CAP);
            let confidence =
                (MATCH_BASE + ev.best_specificity + SUPPORT_STEP * extra as f32).min(0.95);
            if confidence < self.min_confidence {
                continue;
            }
            let from = keys[from_id].clone();
            let to = keys[to_id].clone();
            let from_idx = graph.ensure_node(&from);
            let to_idx = graph.ensure_node(&to);
            graph.upsert_edge(
                from_idx,
                to_idx,
                EdgeInfo {
                    has_value_match: true,
                    confidence,
                    support,
                },
            );
            for (field_path, location) in &ev.flows {
                graph.record_produces(&from, field_path);
                graph.record_consumes(&to, location);
            }
        }

        log::info!(
            "Correlated {} exchange(s): {} node(s), {} edge(s) kept of {} candidate(s)",
            exchanges.len(),
            graph.node_count(),
            graph.edge_count(),
            evidence.len()
        );

        graph
    }
}
