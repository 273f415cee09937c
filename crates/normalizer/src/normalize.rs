use crate::detectors::classify_segment;
use crate::naming::param_name;
use apilens_protocol::{ParamKind, PathParam};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of normalizing one URL path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Path with dynamic segments replaced by `{name}` placeholders
    pub path: String,

    /// One parameter per replaced segment, in path order
    pub params: Vec<PathParam>,
}

fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Normalize a URL path: classify each segment and replace dynamic ones with
/// named placeholders.
///
/// Pure and idempotent: placeholders produced by a previous pass are literal
/// static segments, so `normalize(normalize(p).path) == normalize(p)`.
#[must_use]
pub fn normalize(path: &str) -> NormalizedPath {
    let mut out: Vec<String> = Vec::new();
    let mut params: Vec<PathParam> = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut prev_static: Option<String> = None;
    let mut position = 0usize;

    for segment in path.split('/') {
        if segment.is_empty() {
            out.push(String::new());
            continue;
        }

        match classify_segment(segment) {
            None => {
                out.push(segment.to_string());
                prev_static = Some(segment.to_string());
            }
            Some(kind) => {
                let timestamp = kind == ParamKind::Date
                    && segment.bytes().all(|b| b.is_ascii_digit());
                let base = param_name(kind, prev_static.as_deref(), timestamp);
                let name = unique_name(base, &mut taken);
                out.push(format!("{{{name}}}"));
                params.push(PathParam {
                    name,
                    position,
                    example: Some(segment.to_string()),
                    kind,
                });
            }
        }
        position += 1;
    }

    NormalizedPath {
        path: out.join("/"),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn users_orders_scenario() {
        let result = normalize("/users/123/orders/550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(result.path, "/users/{userId}/orders/{orderId}");
        assert_eq!(result.params.len(), 2);

        assert_eq!(result.params[0].name, "userId");
        assert_eq!(result.params[0].kind, ParamKind::Numeric);
        assert_eq!(result.params[0].position, 1);
        assert_eq!(result.params[0].example.as_deref(), Some("123"));

        assert_eq!(result.params[1].name, "orderId");
        assert_eq!(result.params[1].kind, ParamKind::Uuid);
        assert_eq!(result.params[1].position, 3);
    }

    #[test]
    fn normalization_is_idempotent() {
        let paths = [
            "/users/123/orders/550e8400-e29b-41d4-a716-446655440000",
            "/v1/projects/p_123",
            "/api/v2/reports/2024-04-25",
            "/search",
            "/teams/42/members/a@b.co",
            "",
            "/",
        ];
        for p in paths {
            let once = normalize(p);
            let twice = normalize(&once.path);
            assert_eq!(twice.path, once.path, "path {p:?} not stable");
            assert_eq!(twice.params, Vec::new(), "placeholders re-replaced for {p:?}");
        }
    }

    #[test]
    fn version_markers_and_static_words_survive() {
        let result = normalize("/api/v2/users/42/export");
        assert_eq!(result.path, "/api/v2/users/{userId}/export");
        assert_eq!(result.params.len(), 1);
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let result = normalize("/orders/1/2");
        assert_eq!(result.path, "/orders/{orderId}/{orderId2}");
        assert_eq!(result.params[0].name, "orderId");
        assert_eq!(result.params[1].name, "orderId2");
    }

    #[test]
    fn leading_segment_without_context_is_id() {
        let result = normalize("/12345");
        assert_eq!(result.path, "/{id}");
        assert_eq!(result.params[0].position, 0);
    }

    #[test]
    fn fixed_names_for_email_and_date() {
        let result = normalize("/teams/7/members/a@b.co/reports/2024-01-31");
        assert_eq!(
            result.path,
            "/teams/{teamId}/members/{email}/reports/{date}"
        );
    }

    #[test]
    fn residual_token_named_from_resource() {
        let result = normalize("/v1/projects/p_123");
        assert_eq!(result.path, "/v1/projects/{projectId}");
        assert_eq!(result.params[0].kind, ParamKind::Unknown);
    }
}
