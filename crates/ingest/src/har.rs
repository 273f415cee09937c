//! Browser HAR import.
//!
//! Converts the HAR capture format into the [`RecordedExchange`] input
//! contract. The top-level JSON must parse; individually malformed entries
//! degrade (missing bodies, bad timestamps) instead of failing the import.
//!
//! [`RecordedExchange`]: apilens_protocol::RecordedExchange

use crate::error::Result;
use apilens_protocol::RecordedExchange;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    request: HarRequest,
    response: HarResponse,
    #[serde(default)]
    started_date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    method: String,
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
    #[serde(default)]
    cookies: Vec<HarCookie>,
    #[serde(default)]
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct HarCookie {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarPostData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarResponse {
    status: i64,
    #[serde(default)]
    headers: Vec<HarHeader>,
    #[serde(default)]
    content: Option<HarContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarContent {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

fn header_map(headers: &[HarHeader]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|h| (h.name.to_lowercase(), h.value.clone()))
        .collect()
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(err) => {
            log::debug!("unparseable HAR timestamp {raw:?}: {err}");
            None
        }
    }
}

/// Parse a HAR document into recorded exchanges.
///
/// Errors only on malformed top-level JSON; anything entry-level degrades.
pub fn parse(har_json: &str) -> Result<Vec<RecordedExchange>> {
    let har: Har = serde_json::from_str(har_json)?;

    let exchanges = har
        .log
        .entries
        .into_iter()
        .map(|entry| {
            let request_content_type = entry
                .request
                .post_data
                .as_ref()
                .and_then(|pd| pd.mime_type.clone());
            let request_body = entry.request.post_data.and_then(|pd| pd.text);
            let response_content_type = entry
                .response
                .content
                .as_ref()
                .and_then(|c| c.mime_type.clone());
            let response_body = entry.response.content.and_then(|c| c.text);

            RecordedExchange {
                method: entry.request.method,
                url: entry.request.url,
                request_headers: header_map(&entry.request.headers),
                request_cookies: entry
                    .request
                    .cookies
                    .into_iter()
                    .map(|c| (c.name, c.value))
                    .collect(),
                request_body,
                request_content_type,
                status: u16::try_from(entry.response.status).unwrap_or(0),
                response_headers: header_map(&entry.response.headers),
                response_body,
                response_content_type,
                captured_at: parse_timestamp(entry.started_date_time.as_deref()),
            }
        })
        .collect();

    Ok(exchanges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "log": {
            "entries": [
                {
                    "startedDateTime": "2024-04-25T10:00:00.000Z",
                    "request": {
                        "method": "POST",
                        "url": "https://api.example.com/v1/projects",
                        "headers": [{"name": "Authorization", "value": "Bearer t"}],
                        "cookies": [{"name": "sid", "value": "abc"}],
                        "postData": {"mimeType": "application/json", "text": "{\"name\":\"x\"}"}
                    },
                    "response": {
                        "status": 201,
                        "headers": [{"name": "Content-Type", "value": "application/json"}],
                        "content": {"mimeType": "application/json", "text": "{\"id\":\"p_1\"}"}
                    }
                },
                {
                    "startedDateTime": "not-a-date",
                    "request": {"method": "GET", "url": "https://api.example.com/v1/me", "headers": []},
                    "response": {"status": -1}
                }
            ]
        }
    }"#;

    #[test]
    fn parses_entries_into_exchanges() {
        let exchanges = parse(SAMPLE).expect("parse");
        assert_eq!(exchanges.len(), 2);

        let first = &exchanges[0];
        assert_eq!(first.method, "POST");
        assert_eq!(first.status, 201);
        assert_eq!(
            first.request_headers.get("authorization").map(String::as_str),
            Some("Bearer t")
        );
        assert_eq!(first.request_cookies.get("sid").map(String::as_str), Some("abc"));
        assert_eq!(
            first.response_content_type.as_deref(),
            Some("application/json")
        );
        assert!(first.captured_at.is_some());
    }

    #[test]
    fn entry_level_noise_degrades() {
        let exchanges = parse(SAMPLE).expect("parse");
        let second = &exchanges[1];
        // Bad timestamp and negative status degrade, the entry survives.
        assert_eq!(second.captured_at, None);
        assert_eq!(second.status, 0);
        assert_eq!(second.response_body, None);
    }

    #[test]
    fn malformed_top_level_is_a_typed_error() {
        assert!(parse("{not har").is_err());
        assert!(parse(r#"{"log":{}}"#).expect("empty log").is_empty());
    }
}
