//! Ordered segment shape detectors.
//!
//! The table order is a contract: most specific first, first match wins.
//! Reordering it changes normalization results, so the precedence itself is
//! covered by tests.

use apilens_protocol::ParamKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// API-convention words that are never replaced, even when a detector would
/// match them.
static STATIC_WORDS: Lazy<HashSet<&str>> = Lazy::new(|| {
    [
        "api", "auth", "oauth", "oauth2", "login", "logout", "token", "refresh", "list", "search",
        "query", "export", "import", "batch", "bulk", "new", "edit", "create", "update", "delete",
        "me", "self", "current", "all", "count", "status", "health", "ping", "version", "settings",
        "config", "admin", "public", "internal", "graphql", "rest", "rpc", "web", "mobile", "app",
    ]
    .iter()
    .copied()
    .collect()
});

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v\d+(\.\d+)*$").expect("static regex"));

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("static regex")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s/]+@[^@\s/]+\.[^@\s/]+$").expect("static regex"));

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}(T[\d:.]+Z?)?$").expect("static regex"));

/// Unix epoch seconds or milliseconds.
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}(\d{3})?$").expect("static regex"));

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static regex"));

/// Hex string, at least 8 chars; one digit required so plain English words
/// spelled in a-f do not match.
static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{8,}$").expect("static regex"));

/// Hyphen-joined alphanumeric groups (`my-first-post-2024`).
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)+$").expect("static regex"));

/// Opaque token charset: base64 and url-safe base64.
static BASE64_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/_=-]{16,}$").expect("static regex"));

/// Residual rule: short mixed letter+digit tokens (`p_123`, `a1b2`).
static MIXED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,15}$").expect("static regex"));

/// Check whether a segment is a version marker (`v1`, `v2.1`).
#[must_use]
pub fn is_version_marker(segment: &str) -> bool {
    VERSION_RE.is_match(segment)
}

/// Check whether a segment is an API-convention static word.
#[must_use]
pub fn is_static_word(segment: &str) -> bool {
    STATIC_WORDS.contains(segment.to_lowercase().as_str())
}

fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

fn has_letter(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_alphabetic())
}

/// Classify one path segment against the ordered detector table.
///
/// Returns `None` for static segments. Exclusions (version markers, static
/// words, `{placeholder}` segments) are checked before any detector.
#[must_use]
pub fn classify_segment(segment: &str) -> Option<ParamKind> {
    if segment.is_empty() {
        return None;
    }
    // Already-normalized placeholders are literal static segments; this is
    // what makes normalization idempotent.
    if segment.starts_with('{') && segment.ends_with('}') {
        return None;
    }
    if is_version_marker(segment) || is_static_word(segment) {
        return None;
    }

    if UUID_RE.is_match(segment) {
        return Some(ParamKind::Uuid);
    }
    if EMAIL_RE.is_match(segment) {
        return Some(ParamKind::Email);
    }
    if DATE_RE.is_match(segment) {
        return Some(ParamKind::Date);
    }
    if TIMESTAMP_RE.is_match(segment) {
        return Some(ParamKind::Date);
    }
    if NUMERIC_RE.is_match(segment) {
        return Some(ParamKind::Numeric);
    }
    if HEX_RE.is_match(segment) && has_digit(segment) {
        return Some(ParamKind::Hex);
    }
    if segment.len() >= 8 && SLUG_RE.is_match(segment) {
        return Some(ParamKind::Slug);
    }
    if BASE64_RE.is_match(segment) && has_digit(segment) && has_letter(segment) {
        return Some(ParamKind::Base64);
    }
    if MIXED_RE.is_match(segment) && has_digit(segment) && has_letter(segment) {
        return Some(ParamKind::Unknown);
    }

    None
}
