//! Traffic filtering rule tables.
//!
//! Static lists compiled into the binary. Precedence lives in the ingestor:
//! asset checks run before URL parsing, domain checks before content checks.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// File extensions that mark a request as a static asset.
static ASSET_EXTS: Lazy<Vec<&str>> = Lazy::new(|| {
    vec![
        ".css", ".js", ".mjs", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".avif", ".ico",
        ".map", ".woff", ".woff2", ".ttf", ".eot", ".otf", ".mp4", ".webm", ".mp3", ".wav",
    ]
});

/// Path prefixes that are framework or browser plumbing, not API surface.
static NOISE_PATH_PREFIXES: Lazy<Vec<&str>> = Lazy::new(|| {
    vec![
        "/cdn-cgi/", "/_next/static/", "/_next/data/", "/__nextjs", "/sockjs-node/", "/favicon",
        "/manifest.json", "/robots.txt", "/sitemap", "/.well-known/", "/service-worker", "/sw.js",
        "/workbox-",
    ]
});

/// Third-party domains that are never the target API: analytics, ads,
/// support widgets, CDNs, consent managers, captchas, error trackers.
static THIRD_PARTY_DOMAINS: Lazy<Vec<&str>> = Lazy::new(|| {
    vec![
        // Analytics & tracking
        "google-analytics.com", "googletagmanager.com", "segment.io", "segment.com",
        "mixpanel.com", "amplitude.com", "heapanalytics.com", "posthog.com", "plausible.io",
        "hotjar.com", "clarity.ms", "fullstory.com",
        // Ads & attribution
        "doubleclick.net", "googlesyndication.com", "criteo.com", "taboola.com", "outbrain.com",
        "appsflyer.com", "adjust.com", "branch.io",
        // Social embeds
        "connect.facebook.net", "graph.facebook.com", "platform.twitter.com",
        // Error trackers & monitoring
        "sentry.io", "bugsnag.com", "rollbar.com", "nr-data.net", "datadoghq.com",
        "browser-intake-datadoghq.com", "launchdarkly.com",
        // Support widgets
        "intercom.io", "zendesk.com", "crisp.chat", "drift.com",
        // Payments (third-party, not the target API)
        "stripe.com", "paypal.com", "braintreegateway.com", "adyen.com",
        // CDNs & fonts
        "cdn.jsdelivr.net", "unpkg.com", "cdnjs.cloudflare.com", "fonts.googleapis.com",
        "fonts.gstatic.com", "ajax.googleapis.com",
        // Consent & captcha
        "onetrust.com", "cookielaw.org", "trustarc.com", "recaptcha.net", "hcaptcha.com",
        "challenges.cloudflare.com",
        // Third-party SSO providers
        "accounts.google.com", "auth0.com", "okta.com", "onelogin.com",
    ]
});

/// Auth header names captured verbatim (lowercase exact matches).
static AUTH_HEADER_NAMES: Lazy<HashSet<&str>> = Lazy::new(|| {
    [
        "authorization", "x-api-key", "api-key", "apikey", "x-apikey", "x-key",
        "x-auth-token", "x-auth", "x-authorization", "access-token", "x-access-token",
        "token", "x-token", "jwt", "x-jwt", "x-jwt-token", "id-token", "id_token", "x-id-token",
        "refresh-token", "x-refresh-token", "secret", "x-secret", "api-secret", "x-api-secret",
        "client-secret", "x-client-secret", "session", "session-id", "sessionid", "x-session",
        "x-session-id", "x-session-token", "session-token", "csrf", "x-csrf", "x-csrf-token",
        "csrf-token", "x-xsrf-token", "xsrf-token", "oauth", "oauth-token", "x-oauth-token",
        "x-amz-security-token", "x-amz-access-token", "x-goog-api-key", "x-rapidapi-key",
        "ocp-apim-subscription-key", "x-functions-key", "x-user-token", "x-app-token",
        "x-client-token", "x-access-key", "x-secret-key", "x-signature", "signature",
    ]
    .iter()
    .copied()
    .collect()
});

/// Substring patterns that mark a header as auth-like.
static AUTH_HEADER_PATTERNS: Lazy<Vec<&str>> = Lazy::new(|| {
    vec![
        "auth", "token", "key", "secret", "bearer", "jwt", "session", "credential", "password",
        "signature", "csrf", "xsrf", "oauth",
    ]
});

/// Standard browser/proxy headers that look auth-ish but are not.
static STANDARD_HEADERS: Lazy<HashSet<&str>> = Lazy::new(|| {
    [
        "x-requested-with", "x-forwarded-for", "x-forwarded-host", "x-forwarded-proto",
        "x-real-ip", "x-frame-options", "x-content-type-options", "x-xss-protection",
        "x-powered-by", "x-request-id", "x-correlation-id", "x-trace-id", "x-amz-cf-id",
        "x-amz-cf-pop", "x-cache", "x-cache-hits",
    ]
    .iter()
    .copied()
    .collect()
});

/// Path markers that make a URL look like API surface.
static API_PATH_MARKERS: Lazy<Vec<&str>> = Lazy::new(|| {
    vec![
        "/api/", "/graphql", "/rpc", "/v1/", "/v2/", "/v3/", "/services/", "/query", "/auth",
        "/user", "/account", "/session", "/data",
    ]
});

static TLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(com|org|net|co|io|ai|app|dev|sg|xyz|gg|fm|tv|me|so|to)\.?$")
        .expect("static regex")
});

/// Check whether a URL path points at a static asset or framework noise.
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    let lower = path.to_lowercase();
    ASSET_EXTS.iter().any(|ext| lower.ends_with(ext))
        || NOISE_PATH_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Check whether a domain is known third-party noise.
#[must_use]
pub fn is_third_party_domain(domain: &str) -> bool {
    let lower = domain.to_lowercase();
    THIRD_PARTY_DOMAINS
        .iter()
        .any(|skip| lower == *skip || lower.ends_with(&format!(".{skip}")))
}

/// Check whether a header name looks like an auth header.
#[must_use]
pub fn is_auth_like_header(name: &str) -> bool {
    let lower = name.to_lowercase();
    if STANDARD_HEADERS.contains(lower.as_str()) {
        return false;
    }
    AUTH_HEADER_NAMES.contains(lower.as_str())
        || AUTH_HEADER_PATTERNS.iter().any(|p| lower.contains(p))
}

/// HTTP/2 pseudo-headers (`:method`, `:path`) carry no auth evidence.
#[must_use]
pub fn is_http2_pseudo_header(name: &str) -> bool {
    name.starts_with(':')
}

#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.contains("text/html") || ct.contains("application/xhtml")
}

/// Check whether a request looks like API traffic worth keeping.
#[must_use]
pub fn is_api_like(path: &str, method: &str, domain: &str, content_type: Option<&str>) -> bool {
    if let Some(ct) = content_type {
        if ct.contains("json") {
            return true;
        }
    }
    let path_lower = path.to_lowercase();
    if API_PATH_MARKERS.iter().any(|m| path_lower.contains(m)) {
        return true;
    }
    if matches!(method, "POST" | "PUT" | "PATCH" | "DELETE") {
        return true;
    }
    domain.contains("api.")
        || domain.contains("service")
        || domain.starts_with("dev-")
        || domain.starts_with("staging-")
}

/// Root domain: `api.example.com` -> `example.com`.
#[must_use]
pub fn root_domain(domain: &str) -> String {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2..].join(".")
    } else {
        domain.to_string()
    }
}

#[must_use]
pub fn same_root_domain(a: &str, b: &str) -> bool {
    root_domain(a) == root_domain(b)
}

/// Derive a service name from a domain: strip well-known host prefixes and
/// TLDs, join the rest with hyphens.
#[must_use]
pub fn derive_service_name(domain: &str) -> String {
    let name = domain
        .trim_start_matches("www.")
        .trim_start_matches("api.")
        .trim_start_matches("app.")
        .trim_start_matches("m.");
    let name = TLD_RE.replace_all(name, "");
    let name = name.replace('.', "-").to_lowercase();
    if name.is_empty() {
        "unknown-api".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn static_assets_and_noise_paths() {
        assert!(is_static_asset("/app/main.css"));
        assert!(is_static_asset("/assets/logo.svg"));
        assert!(is_static_asset("/favicon.ico"));
        assert!(is_static_asset("/_next/static/chunk.js"));
        assert!(!is_static_asset("/v1/users"));
    }

    #[test]
    fn third_party_matches_subdomains_not_substrings() {
        assert!(is_third_party_domain("sentry.io"));
        assert!(is_third_party_domain("o123.ingest.sentry.io"));
        assert!(!is_third_party_domain("api.myapp.com"));
        // A target whose name merely contains a skip word is kept.
        assert!(!is_third_party_domain("notsentry.example.com"));
    }

    #[test]
    fn auth_header_detection() {
        assert!(is_auth_like_header("Authorization"));
        assert!(is_auth_like_header("x-api-key"));
        assert!(is_auth_like_header("X-Custom-Token"));
        assert!(!is_auth_like_header("Content-Type"));
        // Standard headers win over substring patterns.
        assert!(!is_auth_like_header("x-request-id"));
        assert!(!is_auth_like_header("x-forwarded-for"));
    }

    #[test]
    fn api_like_rules() {
        assert!(is_api_like("/v1/users", "GET", "example.com", None));
        assert!(is_api_like("/anything", "POST", "example.com", None));
        assert!(is_api_like(
            "/page",
            "GET",
            "example.com",
            Some("application/json")
        ));
        assert!(is_api_like("/page", "GET", "api.example.com", None));
        assert!(!is_api_like("/pricing", "GET", "www.example.com", None));
    }

    #[test]
    fn service_name_derivation() {
        assert_eq!(derive_service_name("api.github.com"), "github");
        assert_eq!(derive_service_name("www.stripe.com"), "stripe");
        assert_eq!(derive_service_name("app.linear.app"), "linear");
        assert_eq!(derive_service_name("dev-quote.zeemart.asia"), "dev-quote-zeemart-asia");
    }

    #[test]
    fn root_domain_comparison() {
        assert!(same_root_domain("api.example.com", "www.example.com"));
        assert!(!same_root_domain("api.example.com", "example.org"));
    }
}
