//! Human-readable merge summaries.

use serde::Serialize;

/// What one merge actually did, accumulated while merging and rendered into
/// the catalog's `diff_summary`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeDelta {
    pub endpoints_added: Vec<String>,
    pub schemas_changed: Vec<String>,
    pub edges_added: usize,
    pub initial: bool,
    pub endpoint_total: usize,
}

impl MergeDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints_added.is_empty() && self.schemas_changed.is_empty() && self.edges_added == 0
    }

    /// Render a short summary (`2 endpoints added, 1 schema changed`).
    #[must_use]
    pub fn summary(&self) -> String {
        if self.initial {
            return format!(
                "initial catalog: {} endpoint{}",
                self.endpoint_total,
                plural(self.endpoint_total)
            );
        }
        if self.is_empty() {
            return "no changes".to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        if !self.endpoints_added.is_empty() {
            parts.push(format!(
                "{} endpoint{} added",
                self.endpoints_added.len(),
                plural(self.endpoints_added.len())
            ));
        }
        if !self.schemas_changed.is_empty() {
            parts.push(format!(
                "{} schema{} changed",
                self.schemas_changed.len(),
                plural(self.schemas_changed.len())
            ));
        }
        if self.edges_added > 0 {
            parts.push(format!(
                "{} dependency edge{} added",
                self.edges_added,
                plural(self.edges_added)
            ));
        }
        parts.join(", ")
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
