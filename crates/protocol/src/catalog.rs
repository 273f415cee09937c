use crate::endpoint::{DependencyEdge, EndpointGroup};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// The persisted, versioned description of an API synthesized from traffic
/// analysis (a "skill").
///
/// Created on the first analysis of a service; mutated only through the
/// synthesizer's merge. The endpoint set never silently shrinks across a
/// merge. The map is keyed by [`EndpointKey::id`] strings so serialization
/// order is deterministic.
///
/// [`EndpointKey::id`]: crate::endpoint::EndpointKey::id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Catalog {
    pub schema_version: u32,

    /// Service identifier (`github`, `linear`, ...)
    pub service: String,

    pub base_url: String,

    #[serde(default)]
    pub base_urls: Vec<String>,

    /// Auth method summary; never credential material
    pub auth_method: String,

    pub endpoints: BTreeMap<String, EndpointGroup>,

    /// Dependency edges between endpoint keys
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,

    /// Content-derived short version hash
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,

    /// Human-readable summary of the last merge
    pub diff_summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Catalog {
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Total observed exchanges across all groups.
    #[must_use]
    pub fn example_count(&self) -> u64 {
        self.endpoints.values().map(|g| u64::from(g.example_count)).sum()
    }
}
