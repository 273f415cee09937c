//! # Apilens Recipe
//!
//! Extraction recipes: user/agent-authored, declarative field-mapping rules
//! applied to a response body at query time.
//!
//! Two entry points:
//!
//! - [`apply`] — run a recipe over a body. Inapplicable recipes (source
//!   path missing, resolution not an array) return `None` so the caller can
//!   fall back to raw data; nothing here panics or errors at apply time.
//! - [`validate`] — static validation of authored recipe JSON before
//!   persistence, accumulating *all* violations rather than stopping at the
//!   first.

mod apply;
mod path;
mod validate;

pub use apply::apply;
pub use path::resolve_path;
pub use validate::validate;
