//! # Apilens Protocol
//!
//! Shared data model for the apilens pipeline.
//!
//! Every entity that crosses a crate boundary lives here: recorded exchanges
//! (the input contract with capture subsystems), inferred schemas, endpoint
//! groups, dependency edges, catalogs (the persisted output contract), and
//! validation evidence. All types are plain serde data with explicit
//! optionality; none of them carry behavior beyond cheap accessors.

pub mod catalog;
pub mod endpoint;
pub mod exchange;
pub mod recipe;
pub mod schema;
pub mod validation;

pub use catalog::{Catalog, CATALOG_SCHEMA_VERSION};
pub use endpoint::{
    DependencyEdge, EndpointCategory, EndpointGroup, EndpointKey, ParamKind, PathParam,
};
pub use exchange::{Exchange, RecordedExchange, TraceBundle};
pub use recipe::{ExtractionRecipe, RecipeFilter};
pub use schema::{DriftResult, FieldType, InferredSchema, TypeChange};
pub use validation::{ValidationEvidence, ValidationResult};
