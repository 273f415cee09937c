//! Atomic catalog persistence.
//!
//! Write goes to a temp file in the target directory followed by a rename,
//! so a crash mid-write never leaves a truncated catalog behind.

use crate::error::{CatalogError, Result};
use apilens_protocol::Catalog;
use std::fs;
use std::path::Path;

/// Persist a catalog as pretty JSON, atomically.
pub fn save(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let bytes = serde_json::to_vec_pretty(catalog)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    log::debug!(
        "Saved catalog {} ({} endpoints) to {}",
        catalog.version,
        catalog.endpoint_count(),
        path.display()
    );
    Ok(())
}

/// Load a previously persisted catalog.
///
/// A missing file is `Ok(None)` — first analysis of a service. A present
/// but unreadable file is a typed error; callers decide whether to abort or
/// start fresh.
pub fn load(path: &Path) -> Result<Option<Catalog>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let catalog = serde_json::from_slice(&bytes).map_err(|source| CatalogError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesize::{synthesize, ServiceInfo};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        let info = ServiceInfo {
            service: "acme".to_string(),
            base_url: "https://api.acme.com".to_string(),
            base_urls: vec!["https://api.acme.com".to_string()],
            auth_method: "Bearer Token".to_string(),
        };
        synthesize(None, &info, &[], &[]).catalog
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("skills").join("acme.json");

        let catalog = sample();
        save(&catalog, &path).expect("save");
        let loaded = load(&path).expect("load").expect("present");
        assert_eq!(loaded, catalog);

        // No stray temp file left behind.
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().expect("tempdir");
        assert!(load(&dir.path().join("nope.json")).expect("load").is_none());
    }

    #[test]
    fn corrupt_file_is_a_typed_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("acme.json");
        fs::write(&path, b"{not json").expect("write");

        match load(&path) {
            Err(CatalogError::Corrupt { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected corrupt error, got {other:?}"),
        }
    }
}
