//! Parameter naming from the preceding static segment.

use apilens_protocol::ParamKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical singulars for common pluralized resource words. The fallback
/// singularization heuristic covers everything else.
static RESOURCE_SINGULARS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    [
        ("users", "user"),
        ("orders", "order"),
        ("projects", "project"),
        ("tasks", "task"),
        ("items", "item"),
        ("products", "product"),
        ("accounts", "account"),
        ("customers", "customer"),
        ("invoices", "invoice"),
        ("messages", "message"),
        ("channels", "channel"),
        ("teams", "team"),
        ("members", "member"),
        ("workspaces", "workspace"),
        ("organizations", "organization"),
        ("repositories", "repository"),
        ("repos", "repo"),
        ("issues", "issue"),
        ("comments", "comment"),
        ("posts", "post"),
        ("threads", "thread"),
        ("events", "event"),
        ("jobs", "job"),
        ("files", "file"),
        ("documents", "document"),
        ("sessions", "session"),
        ("people", "person"),
    ]
    .iter()
    .copied()
    .collect()
});

/// Heuristic singularization: `companies -> company`, `boxes -> box`,
/// `statuses -> status`, `orders -> order`.
fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(stem) = lower.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if !stem.is_empty() {
                // drop the trailing "es"
                return format!("{stem}{}", &suffix[..suffix.len() - 2]);
            }
        }
    }
    if let Some(stem) = lower.strip_suffix('s') {
        if !stem.is_empty() {
            return stem.to_string();
        }
    }
    lower
}

/// Derive a parameter name for a dynamic segment.
///
/// Emails, dates and timestamps get fixed names; everything else is named
/// after the preceding static segment (`users/123` => `userId`). Without a
/// preceding segment the name defaults to `id`.
#[must_use]
pub fn param_name(kind: ParamKind, preceding: Option<&str>, timestamp: bool) -> String {
    match kind {
        ParamKind::Email => return "email".to_string(),
        ParamKind::Date => {
            return if timestamp {
                "timestamp".to_string()
            } else {
                "date".to_string()
            }
        }
        _ => {}
    }

    let Some(prev) = preceding else {
        return "id".to_string();
    };
    let prev = prev.to_lowercase();
    if prev.is_empty() || !prev.bytes().any(|b| b.is_ascii_alphabetic()) {
        return "id".to_string();
    }

    let singular = RESOURCE_SINGULARS
        .get(prev.as_str())
        .map(|s| (*s).to_string())
        .unwrap_or_else(|| singularize(&prev));

    format!("{singular}Id")
}
