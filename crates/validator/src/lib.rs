//! # Apilens Validator
//!
//! Opt-in, read-only liveness probing of catalog endpoints.
//!
//! The validator is the only component in the pipeline that touches the
//! network. It selects a topically diverse subset of `GET`, non-auth
//! endpoints, probes them in fixed-size concurrent batches under a
//! per-request timeout and an overall wall-clock budget, and returns
//! [`ValidationEvidence`] — transient structural proof, never merged into
//! the catalog.
//!
//! Failure is evidence: a request that errors records `status 0, ok=false`
//! and does not abort the batch. There are no retries. Exceeding the budget
//! stops further batches but keeps everything already collected.
//!
//! [`ValidationEvidence`]: apilens_protocol::ValidationEvidence

mod config;
mod error;
mod probe;
mod select;
mod validate;

pub use config::{Credentials, ValidatorConfig};
pub use error::{Result, ValidatorError};
pub use probe::analyze_shape;
pub use select::{fill_path, select_diverse};
pub use validate::EndpointValidator;
