use crate::grouper::group_exchanges;
use apilens_correlator::Correlator;
use apilens_protocol::{DependencyEdge, EndpointGroup, TraceBundle};
use serde::Serialize;

/// Grouper + correlator output, consumed by the catalog synthesizer.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub service: String,
    pub base_url: String,
    pub base_urls: Vec<String>,
    pub auth_method: String,
    pub groups: Vec<EndpointGroup>,
    pub edges: Vec<DependencyEdge>,
}

impl AnalysisReport {
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.groups.len()
    }
}

/// The analysis pipeline behind one façade: bundle in, report out.
///
/// Holds its correlator by value — no process-wide state, safe to construct
/// one per service and run them in parallel.
#[derive(Debug, Default)]
pub struct Analyzer {
    correlator: Correlator,
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_correlator(correlator: Correlator) -> Self {
        Self { correlator }
    }

    /// Run grouping and correlation over a canonical trace bundle.
    #[must_use]
    pub fn analyze(&self, bundle: &TraceBundle) -> AnalysisReport {
        let graph = self.correlator.correlate(&bundle.exchanges);
        let groups = group_exchanges(&bundle.exchanges, &graph);

        log::info!(
            "Analyzed service {}: {} endpoint group(s), {} dependency edge(s)",
            bundle.service,
            groups.len(),
            graph.edge_count()
        );

        AnalysisReport {
            service: bundle.service.clone(),
            base_url: bundle.base_url.clone(),
            base_urls: bundle.base_urls.clone(),
            auth_method: bundle.auth_method.clone(),
            groups,
            edges: graph.edges(),
        }
    }
}
