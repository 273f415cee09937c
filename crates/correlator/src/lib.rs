//! # Apilens Correlator
//!
//! Causal dependency inference between endpoints.
//!
//! ## Architecture
//!
//! ```text
//! Exchange[] (time-ordered)
//!     │
//!     ├──> Value harvester
//!     │      └─ scalar identifier-like values from response bodies
//!     │         (bounded walk, stopword and length filters)
//!     │
//!     ├──> Pairwise matcher
//!     │      └─ earlier response value reappears in a later request's
//!     │         path segment, query value, or body scalar
//!     │
//!     └──> Dependency graph (petgraph)
//!            ├─ Nodes: endpoint keys (method + normalized path)
//!            ├─ Edges: value-flow with confidence
//!            ├─ self-edges dropped, low-confidence edges pruned
//!            └─ produces/consumes bookkeeping per endpoint
//! ```
//!
//! An empty DAG is the normal outcome for unrelated traffic, not an error.

mod correlate;
mod graph;
mod values;

pub use correlate::Correlator;
pub use graph::DependencyGraph;
pub use values::{harvest_values, value_specificity, HarvestedValue};
