//! # Apilens Analyzer
//!
//! Endpoint grouping and pipeline orchestration: collapses a trace bundle's
//! exchanges into endpoint groups keyed by `(method, normalized path)`,
//! categorizes them with a keyword rule table, merges per-sample schemas,
//! runs the dependency correlator, and hands the synthesizer one
//! [`AnalysisReport`].
//!
//! Everything here is a pure, synchronous transformation over the immutable
//! bundle; safe to run repeatedly or in parallel across services.

mod analyze;
mod category;
mod grouper;

pub use analyze::{AnalysisReport, Analyzer};
pub use category::categorize;
pub use grouper::group_exchanges;
