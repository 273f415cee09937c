//! # Apilens Ingest
//!
//! Trace ingestion: turns a raw recorded-exchange list into a canonical
//! [`TraceBundle`] the analytic pipeline can trust.
//!
//! The ingestor owns every judgment call about raw traffic:
//!
//! - drop static assets, third-party domains and HTML page navigations
//!   (table-driven, see [`filters`]);
//! - decompose absolute URLs into domain / path / query with the `url`
//!   crate (unparseable URLs are skipped, never an error);
//! - collect auth-like headers and cookies and classify the auth method —
//!   the summary survives, credential values never leave this crate;
//! - elect the service name and base URL;
//! - order exchanges by capture time when the recorder provided timestamps.
//!
//! [`har`] additionally imports browser HAR files into the same
//! [`RecordedExchange`] input contract.
//!
//! [`TraceBundle`]: apilens_protocol::TraceBundle
//! [`RecordedExchange`]: apilens_protocol::RecordedExchange

pub mod filters;
pub mod har;

mod auth;
mod error;
mod ingestor;

pub use auth::guess_auth_method;
pub use error::{IngestError, Result};
pub use ingestor::TraceIngestor;
