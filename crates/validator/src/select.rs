//! Diverse endpoint selection.

use apilens_protocol::{EndpointCategory, EndpointGroup};
use std::collections::BTreeMap;

/// Bucket key: the first two path segments, placeholders included.
fn topic_of(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join("/")
}

/// Pick up to `max` eligible endpoints, round-robin across topic buckets.
///
/// Eligible means `GET` and not auth surface. Bucketing by the first two
/// path segments avoids probing ten near-duplicate endpoints from one
/// resource while ignoring the rest of the API. Returns the selection plus
/// the count of eligible endpoints left unselected.
#[must_use]
pub fn select_diverse<'a>(
    groups: &'a [EndpointGroup],
    max: usize,
) -> (Vec<&'a EndpointGroup>, usize) {
    let eligible: Vec<&EndpointGroup> = groups
        .iter()
        .filter(|g| g.method == "GET" && g.category != EndpointCategory::Auth)
        .collect();

    let mut buckets: BTreeMap<String, Vec<&EndpointGroup>> = BTreeMap::new();
    for &group in &eligible {
        buckets.entry(topic_of(&group.path)).or_default().push(group);
    }

    let mut selected: Vec<&EndpointGroup> = Vec::new();
    let mut round = 0usize;
    while selected.len() < max {
        let mut took_any = false;
        for bucket in buckets.values() {
            if selected.len() >= max {
                break;
            }
            if let Some(&group) = bucket.get(round) {
                selected.push(group);
                took_any = true;
            }
        }
        if !took_any {
            break;
        }
        round += 1;
    }

    let unselected = eligible.len() - selected.len();
    (selected, unselected)
}

/// Substitute concrete example values into a normalized path and join it to
/// the base URL. `None` when any parameter lacks an example.
#[must_use]
pub fn fill_path(base_url: &str, group: &EndpointGroup) -> Option<String> {
    let mut path = group.path.clone();
    for param in &group.path_params {
        let example = param.example.as_deref()?;
        path = path.replace(&format!("{{{}}}", param.name), example);
    }
    if path.contains('{') {
        // A placeholder with no recorded parameter; not probeable.
        return None;
    }
    Some(format!("{}{path}", base_url.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apilens_protocol::{ParamKind, PathParam};
    use pretty_assertions::assert_eq;

    fn group(method: &str, path: &str, category: EndpointCategory) -> EndpointGroup {
        EndpointGroup {
            method: method.to_string(),
            path: path.to_string(),
            category,
            path_params: Vec::new(),
            query_params: Vec::new(),
            request_schema: None,
            response_schema: None,
            response_summary: "object{}".to_string(),
            example_count: 1,
            dependencies: Vec::new(),
            produces: Vec::new(),
            consumes: Vec::new(),
        }
    }

    #[test]
    fn only_get_non_auth_is_eligible() {
        let groups = vec![
            group("GET", "/v1/users", EndpointCategory::Read),
            group("POST", "/v1/users", EndpointCategory::Write),
            group("GET", "/v1/auth/session", EndpointCategory::Auth),
        ];
        let (selected, unselected) = select_diverse(&groups, 10);
        assert_eq!(selected.len(), 1);
        assert_eq!(unselected, 0);
        assert_eq!(selected[0].path, "/v1/users");
    }

    #[test]
    fn round_robin_spreads_across_topics() {
        let groups = vec![
            group("GET", "/v1/users", EndpointCategory::Read),
            group("GET", "/v1/users/{userId}", EndpointCategory::Read),
            group("GET", "/v1/users/{userId}/orders", EndpointCategory::Read),
            group("GET", "/v1/teams", EndpointCategory::Read),
            group("GET", "/v1/billing", EndpointCategory::Read),
        ];
        let (selected, unselected) = select_diverse(&groups, 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(unselected, 2);

        // One per topic bucket before any bucket contributes a second.
        let topics: Vec<String> = selected.iter().map(|g| topic_of(&g.path)).collect();
        assert_eq!(topics, vec!["v1/billing", "v1/teams", "v1/users"]);
    }

    #[test]
    fn fill_path_substitutes_examples() {
        let mut g = group("GET", "/v1/users/{userId}", EndpointCategory::Read);
        g.path_params.push(PathParam {
            name: "userId".to_string(),
            position: 2,
            example: Some("123".to_string()),
            kind: ParamKind::Numeric,
        });
        assert_eq!(
            fill_path("https://api.example.com/", &g),
            Some("https://api.example.com/v1/users/123".to_string())
        );

        g.path_params[0].example = None;
        assert_eq!(fill_path("https://api.example.com", &g), None);
    }
}
