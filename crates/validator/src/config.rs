use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Validation run limits. Loadable from TOML by the CLI; every field has a
/// conservative default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Upper bound on endpoints probed in one run
    pub max_endpoints: usize,

    /// Concurrent requests per batch
    pub batch_size: usize,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Overall wall-clock budget for the whole run in milliseconds
    pub total_budget_ms: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_endpoints: 10,
            batch_size: 3,
            request_timeout_ms: 10_000,
            total_budget_ms: 45_000,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn total_budget(&self) -> Duration {
        Duration::from_millis(self.total_budget_ms)
    }
}

/// Credentials supplied at the boundary by the caller. Extraction and
/// storage of credentials are someone else's job; the validator only
/// attaches what it is handed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Credentials {
    /// Render cookies as a single `Cookie` header value.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_bounded() {
        let config = ValidatorConfig::default();
        assert!(config.batch_size >= 1);
        assert!(config.max_endpoints >= config.batch_size);
        assert!(config.total_budget() > config.request_timeout());
    }

    #[test]
    fn cookie_header_assembly() {
        let mut credentials = Credentials::default();
        assert_eq!(credentials.cookie_header(), None);
        credentials
            .cookies
            .insert("sid".to_string(), "abc".to_string());
        credentials
            .cookies
            .insert("theme".to_string(), "dark".to_string());
        assert_eq!(
            credentials.cookie_header().as_deref(),
            Some("sid=abc; theme=dark")
        );
    }
}
