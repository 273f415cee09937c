//! # Apilens Schema
//!
//! JSON shape inference and drift detection.
//!
//! `infer` turns a JSON body into a compact [`InferredSchema`]: a flattened
//! field-path → type map plus a human-readable summary string. Inference is
//! pure and hard-bounded in both recursion depth and fields per level, so
//! pathological inputs cannot cause unbounded work — oversized input is
//! truncated, never an error.
//!
//! Arrays are sampled from their first element only. This assumes
//! homogeneous arrays; heterogeneous arrays will silently misreport minority
//! shapes. Documented approximation, not a guarantee.
//!
//! [`InferredSchema`]: apilens_protocol::InferredSchema

mod drift;
mod infer;

pub use drift::{detect_drift, merge_field_maps, merge_schemas};
pub use infer::{infer, infer_body, summarize, value_type, MAX_DEPTH, MAX_FIELDS_PER_LEVEL};
