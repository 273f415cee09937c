use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of probing one endpoint.
///
/// Network failures are evidence, not errors: they surface as `status: 0`,
/// `ok: false` with the error text attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ValidationResult {
    pub method: String,
    pub url: String,

    /// HTTP status, or 0 when the request never completed
    pub status: u16,

    /// Verified: 2xx status and a non-trivial body
    pub ok: bool,

    pub latency_ms: u64,

    /// Compact response shape (`array[12]`, `object{id,name,...}`, `html`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transient, non-authoritative report from one validation run.
///
/// Never merged into the catalog. `passed` requires at least one verified
/// endpoint and a verified fraction of at least 50% of those actually
/// tested; skipped endpoints do not count against the ratio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ValidationEvidence {
    pub endpoints_tested: u32,
    pub endpoints_verified: u32,
    pub endpoints_failed: u32,
    pub endpoints_skipped: u32,

    pub results: Vec<ValidationResult>,

    pub passed: bool,

    /// OS the run executed on (`linux`, `macos`, ...)
    pub platform: String,

    pub tool_version: String,
}

impl ValidationEvidence {
    /// Verified fraction over tested endpoints, 0.0 when none were tested.
    #[must_use]
    pub fn verified_ratio(&self) -> f64 {
        if self.endpoints_tested == 0 {
            return 0.0;
        }
        f64::from(self.endpoints_verified) / f64::from(self.endpoints_tested)
    }
}
