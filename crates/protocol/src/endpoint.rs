use crate::schema::InferredSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape class of a dynamic path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Numeric,
    Uuid,
    Hex,
    Base64,
    Date,
    Slug,
    Email,
    Unknown,
}

impl ParamKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Uuid => "uuid",
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Date => "date",
            Self::Slug => "slug",
            Self::Email => "email",
            Self::Unknown => "unknown",
        }
    }
}

/// A named dynamic segment within one normalized path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PathParam {
    /// Placeholder name (`userId`)
    pub name: String,

    /// Zero-based segment position in the path
    pub position: usize,

    /// A concrete observed value, when one is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    pub kind: ParamKind,
}

/// Coarse intent category of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EndpointCategory {
    Auth,
    Read,
    Write,
    Delete,
    Other,
}

impl EndpointCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Other => "other",
        }
    }
}

/// Unique key of an endpoint group: method plus normalized path.
///
/// Normalization is idempotent, so the same logical endpoint always maps to
/// the same key regardless of capture order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct EndpointKey {
    pub method: String,
    pub path: String,
}

impl EndpointKey {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Stable string id used as the catalog map key (`GET /v1/users/{userId}`).
    #[must_use]
    pub fn id(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The unit of the catalog: one logical endpoint aggregated from one or more
/// observed exchanges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EndpointGroup {
    pub method: String,

    /// Normalized path with `{name}` placeholders
    pub path: String,

    pub category: EndpointCategory,

    #[serde(default)]
    pub path_params: Vec<PathParam>,

    /// Observed query parameter names (values are never stored)
    #[serde(default)]
    pub query_params: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<InferredSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<InferredSchema>,

    /// Compact response shape string
    pub response_summary: String,

    /// How many exchanges contributed to this group
    pub example_count: u32,

    /// Keys of upstream endpoints whose outputs this endpoint consumes
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Response field paths whose values were consumed downstream
    #[serde(default)]
    pub produces: Vec<String>,

    /// Request locations that received values produced upstream
    #[serde(default)]
    pub consumes: Vec<String>,
}

impl EndpointGroup {
    #[must_use]
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(self.method.clone(), self.path.clone())
    }

    /// Whether every path parameter carries a concrete example value.
    #[must_use]
    pub fn has_concrete_examples(&self) -> bool {
        self.path_params.iter().all(|p| p.example.is_some())
    }
}

/// Directed value-flow edge between two endpoint groups.
///
/// Derived by the correlator, never authored directly. `from != to` always
/// holds; self-edges are dropped at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct DependencyEdge {
    pub from: EndpointKey,
    pub to: EndpointKey,

    /// Whether an exact response→request value match supports this edge
    pub has_value_match: bool,

    /// Combined confidence in `(0, 1]`
    pub confidence: f32,
}
