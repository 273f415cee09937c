use apilens_protocol::{DependencyEdge, EndpointKey};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Edge payload while the graph is being assembled.
#[derive(Debug, Clone)]
pub(crate) struct EdgeInfo {
    pub has_value_match: bool,
    pub confidence: f32,
    /// Distinct supporting exchange pairs
    pub support: u32,
}

/// Directed value-flow graph between endpoint groups.
///
/// Wraps a petgraph `DiGraph` with a key → node index for fast lookup and
/// produces/consumes bookkeeping per endpoint.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<EndpointKey, EdgeInfo>,
    key_index: HashMap<String, NodeIndex>,
    produces: BTreeMap<String, BTreeSet<String>>,
    consumes: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ensure_node(&mut self, key: &EndpointKey) -> NodeIndex {
        if let Some(&idx) = self.key_index.get(&key.id()) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.key_index.insert(key.id(), idx);
        idx
    }

    pub(crate) fn upsert_edge(&mut self, from: NodeIndex, to: NodeIndex, info: EdgeInfo) {
        if let Some(edge) = self.graph.find_edge(from, to) {
            if let Some(existing) = self.graph.edge_weight_mut(edge) {
                existing.support += info.support;
                existing.confidence = existing.confidence.max(info.confidence);
                existing.has_value_match |= info.has_value_match;
            }
        } else {
            self.graph.add_edge(from, to, info);
        }
    }

    pub(crate) fn record_produces(&mut self, key: &EndpointKey, field_path: &str) {
        self.produces
            .entry(key.id())
            .or_default()
            .insert(field_path.to_string());
    }

    pub(crate) fn record_consumes(&mut self, key: &EndpointKey, location: &str) {
        self.consumes
            .entry(key.id())
            .or_default()
            .insert(location.to_string());
    }

    /// All edges, sorted by `(from, to)` for deterministic output.
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_references()
            .map(|e| DependencyEdge {
                from: self.graph[e.source()].clone(),
                to: self.graph[e.target()].clone(),
                has_value_match: e.weight().has_value_match,
                confidence: e.weight().confidence,
            })
            .collect();
        edges.sort_by(|a, b| (a.from.id(), a.to.id()).cmp(&(b.from.id(), b.to.id())));
        edges
    }

    /// Upstream endpoint ids a given endpoint consumes values from.
    #[must_use]
    pub fn dependencies_of(&self, key: &EndpointKey) -> Vec<String> {
        let Some(&idx) = self.key_index.get(&key.id()) else {
            return Vec::new();
        };
        let mut deps: Vec<String> = self
            .graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .map(|e| self.graph[e.source()].id())
            .collect();
        deps.sort();
        deps.dedup();
        deps
    }

    /// Response field paths of this endpoint whose values fed others.
    #[must_use]
    pub fn produces_for(&self, key: &EndpointKey) -> Vec<String> {
        self.produces
            .get(&key.id())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Request locations of this endpoint that received upstream values.
    #[must_use]
    pub fn consumes_for(&self, key: &EndpointKey) -> Vec<String> {
        self.consumes
            .get(&key.id())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
