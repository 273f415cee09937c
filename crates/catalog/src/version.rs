//! Content-derived catalog versioning.

use apilens_protocol::EndpointGroup;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Length of the short hex version identifier.
const VERSION_LEN: usize = 12;

/// Canonical signature of one endpoint group.
///
/// Covers everything structural — method, path, params, query names, schema
/// field maps — and nothing volatile (no example counts, no timestamps), so
/// re-observing known traffic does not move the version.
#[must_use]
pub fn group_signature(group: &EndpointGroup) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("{} {}", group.method, group.path));
    parts.push(group.category.as_str().to_string());

    let mut params: Vec<String> = group
        .path_params
        .iter()
        .map(|p| format!("{}:{}", p.name, p.kind.as_str()))
        .collect();
    params.sort();
    parts.push(format!("params[{}]", params.join(",")));

    let mut query = group.query_params.clone();
    query.sort();
    parts.push(format!("query[{}]", query.join(",")));

    for (label, schema) in [
        ("req", group.request_schema.as_ref()),
        ("resp", group.response_schema.as_ref()),
    ] {
        match schema {
            Some(schema) => {
                let fields: Vec<String> = schema
                    .fields
                    .iter()
                    .map(|(path, ty)| format!("{path}={}", ty.as_str()))
                    .collect();
                parts.push(format!("{label}{{{}}}", fields.join(";")));
            }
            None => parts.push(format!("{label}{{}}")),
        }
    }

    parts.join("|")
}

/// Short content hash over a canonical, order-independent serialization of
/// the endpoint map.
#[must_use]
pub fn catalog_version(endpoints: &BTreeMap<String, EndpointGroup>) -> String {
    let mut hasher = Sha256::new();
    // BTreeMap iteration is key-sorted, so insertion order never leaks into
    // the hash.
    for (id, group) in endpoints {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
        hasher.update(group_signature(group).as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    digest
        .iter()
        .take(VERSION_LEN / 2)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apilens_protocol::{EndpointCategory, EndpointGroup};
    use pretty_assertions::assert_eq;

    fn group(method: &str, path: &str, examples: u32) -> EndpointGroup {
        EndpointGroup {
            method: method.to_string(),
            path: path.to_string(),
            category: EndpointCategory::Read,
            path_params: Vec::new(),
            query_params: Vec::new(),
            request_schema: None,
            response_schema: None,
            response_summary: "object{}".to_string(),
            example_count: examples,
            dependencies: Vec::new(),
            produces: Vec::new(),
            consumes: Vec::new(),
        }
    }

    #[test]
    fn version_is_short_hex() {
        let mut endpoints = BTreeMap::new();
        endpoints.insert("GET /a".to_string(), group("GET", "/a", 1));
        let version = catalog_version(&endpoints);
        assert_eq!(version.len(), 12);
        assert!(version.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn version_ignores_example_counts() {
        let mut a = BTreeMap::new();
        a.insert("GET /a".to_string(), group("GET", "/a", 1));
        let mut b = BTreeMap::new();
        b.insert("GET /a".to_string(), group("GET", "/a", 99));
        assert_eq!(catalog_version(&a), catalog_version(&b));
    }

    #[test]
    fn version_moves_with_structure() {
        let mut a = BTreeMap::new();
        a.insert("GET /a".to_string(), group("GET", "/a", 1));
        let mut b = a.clone();
        b.insert("GET /b".to_string(), group("GET", "/b", 1));
        assert_ne!(catalog_version(&a), catalog_version(&b));
    }

    #[test]
    fn version_is_insertion_order_independent() {
        let mut forward = BTreeMap::new();
        forward.insert("GET /a".to_string(), group("GET", "/a", 1));
        forward.insert("GET /b".to_string(), group("GET", "/b", 1));

        let mut reverse = BTreeMap::new();
        reverse.insert("GET /b".to_string(), group("GET", "/b", 1));
        reverse.insert("GET /a".to_string(), group("GET", "/a", 1));

        assert_eq!(catalog_version(&forward), catalog_version(&reverse));
    }
}
