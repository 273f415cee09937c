//! End-to-end pipeline: raw recorded exchanges through ingestion, grouping
//! and correlation.

use apilens_analyzer::Analyzer;
use apilens_ingest::TraceIngestor;
use apilens_protocol::{EndpointCategory, RecordedExchange};
use std::collections::BTreeMap;

fn recorded(
    method: &str,
    url: &str,
    request_body: Option<&str>,
    response_body: &str,
) -> RecordedExchange {
    let mut request_headers = BTreeMap::new();
    request_headers.insert("authorization".to_string(), "Bearer tok_xyz".to_string());
    RecordedExchange {
        method: method.to_string(),
        url: url.to_string(),
        request_headers,
        request_cookies: BTreeMap::new(),
        request_body: request_body.map(String::from),
        request_content_type: request_body.map(|_| "application/json".to_string()),
        status: 200,
        response_headers: BTreeMap::new(),
        response_body: Some(response_body.to_string()),
        response_content_type: Some("application/json".to_string()),
        captured_at: None,
    }
}

#[test]
fn raw_traffic_becomes_grouped_catalogable_report() {
    let raw = vec![
        recorded(
            "POST",
            "https://api.acme.com/v1/auth/login",
            Some(r#"{"email":"a@b.co","password":"secret123"}"#),
            r#"{"token":"tok_abc123def456xyz"}"#,
        ),
        recorded(
            "POST",
            "https://api.acme.com/v1/projects",
            Some(r#"{"name":"Demo"}"#),
            r#"{"project":{"id":"p_123"}}"#,
        ),
        recorded(
            "GET",
            "https://api.acme.com/v1/projects/p_123",
            None,
            r#"{"project":{"id":"p_123","name":"Demo"}}"#,
        ),
        recorded(
            "POST",
            "https://api.acme.com/v1/tasks",
            Some(r#"{"projectId":"p_123","title":"First"}"#),
            r#"{"task":{"id":"t_987"}}"#,
        ),
        // Noise that must vanish during ingestion.
        recorded("GET", "https://api.acme.com/assets/app.css", None, "body{}"),
        recorded(
            "POST",
            "https://o1.ingest.sentry.io/envelope",
            None,
            r#"{"ok":true}"#,
        ),
    ];

    let bundle = TraceIngestor::new().ingest(&raw, Some("https://www.acme.com"));
    assert_eq!(bundle.service, "acme");
    assert_eq!(bundle.auth_method, "Bearer Token");
    assert_eq!(bundle.exchanges.len(), 4);

    let report = Analyzer::new().analyze(&bundle);
    assert_eq!(report.endpoint_count(), 4);

    let login = report
        .groups
        .iter()
        .find(|g| g.path == "/v1/auth/login")
        .expect("login group");
    assert_eq!(login.category, EndpointCategory::Auth);

    let detail = report
        .groups
        .iter()
        .find(|g| g.path == "/v1/projects/{projectId}")
        .expect("project detail group");
    assert_eq!(detail.method, "GET");
    assert_eq!(detail.path_params[0].example.as_deref(), Some("p_123"));

    // The create → task flow must survive the whole pipeline.
    assert!(report.edges.iter().any(|e| {
        e.from.id() == "POST /v1/projects" && e.to.id() == "POST /v1/tasks" && e.confidence > 0.6
    }));

    let tasks = report
        .groups
        .iter()
        .find(|g| g.path == "/v1/tasks")
        .expect("tasks group");
    assert!(tasks
        .dependencies
        .contains(&"POST /v1/projects".to_string()));
    assert!(tasks.consumes.contains(&"body:projectId".to_string()));
}

#[test]
fn analysis_is_deterministic_across_runs() {
    let raw = vec![
        recorded(
            "POST",
            "https://api.acme.com/v1/projects",
            Some(r#"{"name":"Demo"}"#),
            r#"{"project":{"id":"p_123"}}"#,
        ),
        recorded(
            "GET",
            "https://api.acme.com/v1/projects/p_123",
            None,
            r#"{"project":{"id":"p_123"}}"#,
        ),
    ];

    let bundle = TraceIngestor::new().ingest(&raw, None);
    let analyzer = Analyzer::new();
    let a = serde_json::to_string(&analyzer.analyze(&bundle)).expect("serialize");
    let b = serde_json::to_string(&analyzer.analyze(&bundle)).expect("serialize");
    assert_eq!(a, b);
}
