//! # Apilens Catalog
//!
//! Catalog synthesis: merge freshly analyzed endpoint groups into a
//! previously persisted catalog, compute a content-derived version hash and
//! a human-readable diff, persist atomically.
//!
//! The defining invariant: **the endpoint union across a merge is
//! monotonically non-decreasing**. Traffic capture is inherently partial, so
//! an endpoint a new run failed to re-observe is never deleted. There is no
//! prune path in this crate at all.
//!
//! Synthesis is stable: identical input twice produces the same version hash
//! and `changed = false` on the second run.

mod diff;
mod error;
mod store;
mod synthesize;
mod version;

pub use diff::MergeDelta;
pub use error::{CatalogError, Result};
pub use store::{load, save};
pub use synthesize::{synthesize, ServiceInfo, SynthesisOutcome};
pub use version::{catalog_version, group_signature};
