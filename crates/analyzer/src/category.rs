//! Endpoint categorization rules.

use apilens_protocol::EndpointCategory;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Path segments that mark an endpoint as auth surface. Matched per segment
/// after stripping trailing digits (`oauth2` -> `oauth`), so `authors` does
/// not trip the `auth` rule.
static AUTH_SEGMENTS: Lazy<HashSet<&str>> = Lazy::new(|| {
    [
        "auth", "oauth", "login", "logout", "signin", "signout", "signup", "register", "token",
        "session", "sessions", "password", "sso", "mfa", "otp", "refresh",
    ]
    .iter()
    .copied()
    .collect()
});

fn is_auth_path(path: &str) -> bool {
    path.split('/').filter(|s| !s.is_empty()).any(|segment| {
        let trimmed = segment
            .to_lowercase()
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .to_string();
        AUTH_SEGMENTS.contains(trimmed.as_str())
    })
}

/// Categorize one endpoint. Ordered rules: auth path words win over the
/// method-based classes.
#[must_use]
pub fn categorize(method: &str, path: &str) -> EndpointCategory {
    if is_auth_path(path) {
        return EndpointCategory::Auth;
    }
    match method {
        "DELETE" => EndpointCategory::Delete,
        "POST" | "PUT" | "PATCH" => EndpointCategory::Write,
        "GET" | "HEAD" => EndpointCategory::Read,
        _ => EndpointCategory::Other,
    }
}
