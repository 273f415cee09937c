//! Auth method classification from collected header/cookie evidence.

use std::collections::BTreeMap;

const AUTH_COOKIE_NAMES: &[&str] = &[
    "session", "sessionid", "token", "authtoken", "jwt", "auth", "access_token", "accesstoken",
    "id_token", "refresh_token",
];

/// Classify the auth method from auth-like request headers and cookies.
///
/// Evaluated as an ordered rule list, most specific first. Returns a
/// human-readable summary naming the carrying header where useful; never
/// returns credential values.
#[must_use]
pub fn guess_auth_method(
    headers: &BTreeMap<String, String>,
    cookies: &BTreeMap<String, String>,
) -> String {
    let names: Vec<String> = headers.keys().map(|h| h.to_lowercase()).collect();

    if headers
        .values()
        .any(|v| v.to_lowercase().starts_with("bearer "))
    {
        return "Bearer Token".to_string();
    }

    if let Some(name) = names
        .iter()
        .find(|h| h.contains("api-key") || h.contains("apikey") || *h == "x-key")
    {
        return format!("API Key ({name})");
    }

    if let Some(name) = names
        .iter()
        .find(|h| h.contains("jwt") || h.contains("id-token") || h.contains("id_token"))
    {
        return format!("JWT ({name})");
    }

    if names.iter().any(|h| h == "authorization") {
        let value = headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == "authorization")
            .map(|(_, v)| v.to_lowercase())
            .unwrap_or_default();
        if value.starts_with("basic ") {
            return "Basic Auth".to_string();
        }
        if value.starts_with("digest ") {
            return "Digest Auth".to_string();
        }
        return "Authorization Header".to_string();
    }

    if let Some(name) = names
        .iter()
        .find(|h| h.contains("session") || h.contains("csrf") || h.contains("xsrf"))
    {
        return format!("Session Token ({name})");
    }

    if names.iter().any(|h| h.contains("amz")) {
        return "AWS Signature".to_string();
    }

    if let Some(name) = names.iter().find(|h| h.contains("oauth")) {
        return format!("OAuth ({name})");
    }

    if let Some(name) = names
        .iter()
        .find(|h| h.contains("auth") || h.contains("token"))
    {
        return format!("Custom Token ({name})");
    }

    if let Some(name) = names.iter().find(|h| h.starts_with("x-")) {
        return format!("Custom Header ({name})");
    }

    for known in AUTH_COOKIE_NAMES {
        if cookies.keys().any(|c| c.to_lowercase() == *known) {
            return format!("Cookie-based ({known})");
        }
    }
    if let Some(name) = cookies.keys().find(|c| {
        let lower = c.to_lowercase();
        lower.contains("auth") || lower.contains("token") || lower.contains("session")
    }) {
        return format!("Cookie-based ({name})");
    }

    "Unknown (may need login)".to_string()
}
