//! Dot/bracket path resolution into JSON values.

use serde_json::Value;

fn parse_part(part: &str) -> Option<(&str, Vec<usize>)> {
    let Some(pos) = part.find('[') else {
        return Some((part, Vec::new()));
    };
    let key = &part[..pos];
    let mut indices = Vec::new();
    let mut rest = &part[pos..];
    while let Some(inner) = rest.strip_prefix('[') {
        let end = inner.find(']')?;
        indices.push(inner[..end].parse().ok()?);
        rest = &inner[end + 1..];
    }
    if !rest.is_empty() {
        return None;
    }
    Some((key, indices))
}

/// Resolve a dot/bracket path (`data.items[0].name`) into a body.
///
/// An empty path resolves to the body itself. Any miss — absent key, index
/// out of bounds, descent into a scalar, malformed bracket — yields `None`.
#[must_use]
pub fn resolve_path<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(body);
    }
    let mut current = body;
    for part in path.split('.') {
        let (key, indices) = parse_part(part)?;
        if !key.is_empty() {
            current = current.get(key)?;
        } else if indices.is_empty() {
            // A bare `.` or `..` in the path.
            return None;
        }
        for idx in indices {
            current = current.get(idx)?;
        }
    }
    Some(current)
}
