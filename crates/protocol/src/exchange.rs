use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One captured request/response pair from observed traffic.
///
/// This is the sole input contract with the capture subsystem. Header and
/// cookie values are consumed by the ingestor for auth detection and are not
/// carried past the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct RecordedExchange {
    /// HTTP method, uppercase (`GET`, `POST`, ...)
    pub method: String,

    /// Absolute request URL
    pub url: String,

    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,

    #[serde(default)]
    pub request_cookies: BTreeMap<String, String>,

    /// Raw request body text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,

    /// Declared request content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_content_type: Option<String>,

    /// HTTP response status code
    pub status: u16,

    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,

    /// Raw response body text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    /// Declared response content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content_type: Option<String>,

    /// Capture timestamp, when the recorder provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

/// Canonical exchange produced by the ingestor: URL decomposed, noise
/// filtered, credential material stripped. Immutable for the duration of one
/// analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Exchange {
    pub method: String,
    pub url: String,
    pub domain: String,

    /// URL path component (`/v1/users/123`)
    pub path: String,

    /// Decoded query pairs in URL order
    #[serde(default)]
    pub query: Vec<(String, String)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_content_type: Option<String>,

    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

impl Exchange {
    /// Check whether either body declares a JSON content type.
    #[must_use]
    pub fn has_json_response(&self) -> bool {
        self.response_content_type
            .as_deref()
            .map(|ct| ct.contains("json"))
            .unwrap_or(false)
    }
}

/// Ingestor output: the canonical trace plus service-level conclusions.
///
/// The auth method is a human-readable summary (`Bearer Token`,
/// `API Key (x-api-key)`, ...); credential values never leave the ingestor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TraceBundle {
    /// Derived service identifier (`github`, `linear`, ...)
    pub service: String,

    /// Elected primary base URL
    pub base_url: String,

    /// All API base URLs seen in the trace
    #[serde(default)]
    pub base_urls: Vec<String>,

    /// Auth method summary
    pub auth_method: String,

    /// Canonical exchanges, ordered by capture time
    pub exchanges: Vec<Exchange>,
}

impl TraceBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
