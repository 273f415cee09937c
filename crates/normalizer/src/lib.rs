//! # Apilens Normalizer
//!
//! URL template normalization: detects dynamic path segments (ids, UUIDs,
//! dates, tokens) and replaces them with named `{placeholder}` parameters.
//!
//! ## Architecture
//!
//! ```text
//! /users/123/orders/550e8400-...
//!     │
//!     ├──> Segment classifier (ordered detector table)
//!     │      ├─ exclusions: version markers, API convention words
//!     │      └─ detectors, most specific first: uuid, email, date,
//!     │         timestamp, numeric, hex, slug, base64, residual unknown
//!     │
//!     └──> Parameter namer (preceding resource segment)
//!            ├─ plural lookup table -> canonical singular + "Id"
//!            ├─ heuristic singularization fallback
//!            └─ collision suffixes (orderId, orderId2, ...)
//!
//! => /users/{userId}/orders/{orderId}
//! ```
//!
//! Normalization is pure and idempotent: placeholders are treated as literal
//! static segments, so normalizing an already-normalized path returns it
//! unchanged. There is no error path; any segment that cannot be classified
//! stays static.

mod detectors;
mod naming;
mod normalize;

pub use detectors::{classify_segment, is_static_word, is_version_marker};
pub use naming::param_name;
pub use normalize::{normalize, NormalizedPath};
