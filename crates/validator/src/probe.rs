//! Single-endpoint probing and response shape analysis.

use crate::config::Credentials;
use apilens_protocol::ValidationResult;
use serde_json::Value;
use std::time::Instant;

/// Compact structural description of a probed response body.
#[must_use]
pub fn analyze_shape(body: &str) -> String {
    if body.trim().is_empty() {
        return "empty".to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => format!("array[{}]", items.len()),
        Ok(Value::Object(obj)) => {
            let fields: Vec<&str> = obj.keys().map(String::as_str).take(5).collect();
            if obj.len() > 5 {
                format!("object{{{},...}}", fields.join(","))
            } else {
                format!("object{{{}}}", fields.join(","))
            }
        }
        Ok(_) => "json-primitive".to_string(),
        Err(_) => {
            if body.contains("<!DOCTYPE") || body.contains("<html") {
                "html".to_string()
            } else {
                "text".to_string()
            }
        }
    }
}

/// Whether a 2xx body actually carries structure worth calling verified:
/// a non-empty array, non-empty object, non-empty string, or any number.
/// Non-JSON bodies (login pages, error HTML) do not verify an API endpoint.
#[must_use]
pub(crate) fn is_non_trivial(body: &str) -> bool {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Array(items)) => !items.is_empty(),
        Ok(Value::Object(obj)) => !obj.is_empty(),
        Ok(Value::String(s)) => !s.is_empty(),
        Ok(Value::Number(_)) => true,
        _ => false,
    }
}

/// Probe one endpoint with a real credentialed GET.
///
/// Network failure becomes a `status 0, ok=false` result, never an error.
pub(crate) async fn probe(
    client: &reqwest::Client,
    url: String,
    credentials: &Credentials,
) -> ValidationResult {
    let mut request = client.get(&url);
    for (name, value) in &credentials.headers {
        request = request.header(name, value);
    }
    if let Some(cookie) = credentials.cookie_header() {
        request = request.header("Cookie", cookie);
    }

    let start = Instant::now();
    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let latency_ms = start.elapsed().as_millis() as u64;
            let ok = (200..300).contains(&status) && is_non_trivial(&body);
            ValidationResult {
                method: "GET".to_string(),
                url,
                status,
                ok,
                latency_ms,
                shape: Some(analyze_shape(&body)),
                error: None,
            }
        }
        Err(err) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            log::debug!("probe failed for {url}: {err}");
            ValidationResult {
                method: "GET".to_string(),
                url,
                status: 0,
                ok: false,
                latency_ms,
                shape: Some("error".to_string()),
                error: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shape_rendering() {
        assert_eq!(analyze_shape(""), "empty");
        assert_eq!(analyze_shape("[1,2,3]"), "array[3]");
        assert_eq!(analyze_shape(r#"{"id":1,"name":"a"}"#), "object{id,name}");
        assert_eq!(
            analyze_shape(r#"{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6}"#),
            "object{a,b,c,d,e,...}"
        );
        assert_eq!(analyze_shape("42"), "json-primitive");
        assert_eq!(analyze_shape("<html><body>login</body></html>"), "html");
        assert_eq!(analyze_shape("plain words"), "text");
    }

    #[test]
    fn trivial_bodies_do_not_verify() {
        assert!(is_non_trivial(r#"{"ok":true}"#));
        assert!(is_non_trivial("[1]"));
        assert!(is_non_trivial(r#""token""#));
        assert!(is_non_trivial("7"));

        assert!(!is_non_trivial("[]"));
        assert!(!is_non_trivial("{}"));
        assert!(!is_non_trivial(r#""""#));
        assert!(!is_non_trivial("null"));
        assert!(!is_non_trivial("true"));
        assert!(!is_non_trivial("<html>login page</html>"));
        assert!(!is_non_trivial(""));
    }
}
