//! Resource manifest: a TOML list of descriptors.
//!
//! ```toml
//! [[resource]]
//! url = "https://cdn.example/marked.min.js"
//! name = "marked"
//!
//! [[resource]]
//! url = "css/theme.css"
//! name = "theme"
//! required = false
//! priority = "low"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::descriptor::ResourceDescriptor;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceDescriptor>,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("in manifest {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(data).context("parsing manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Urls must be non-empty and unique; names must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for r in &self.resources {
            if r.url.trim().is_empty() {
                anyhow::bail!("resource '{}' has an empty url", r.name);
            }
            if r.name.trim().is_empty() {
                anyhow::bail!("resource {} has an empty name", r.url);
            }
            if !seen.insert(r.url.as_str()) {
                anyhow::bail!("duplicate resource url {}", r.url);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Priority, ResourceKind};

    #[test]
    fn parse_with_defaults() {
        let m = Manifest::parse(
            r#"
            [[resource]]
            url = "https://cdn.example/marked.min.js"
            name = "marked"

            [[resource]]
            url = "css/theme"
            name = "theme"
            required = false
            priority = "low"
            kind = "style"
            "#,
        )
        .unwrap();
        assert_eq!(m.resources.len(), 2);
        assert!(m.resources[0].required);
        assert_eq!(m.resources[0].priority, Priority::High);
        assert!(!m.resources[1].required);
        assert_eq!(m.resources[1].priority, Priority::Low);
        assert_eq!(m.resources[1].resolved_kind(), ResourceKind::Style);
    }

    #[test]
    fn empty_manifest_is_valid() {
        assert!(Manifest::parse("").unwrap().resources.is_empty());
    }

    #[test]
    fn rejects_duplicates_and_bad_priority() {
        let dup = r#"
            [[resource]]
            url = "a.js"
            name = "a"
            [[resource]]
            url = "a.js"
            name = "a2"
        "#;
        assert!(format!("{:#}", Manifest::parse(dup).unwrap_err()).contains("duplicate"));

        let bad = r#"
            [[resource]]
            url = "a.js"
            name = "a"
            priority = "urgent"
        "#;
        assert!(Manifest::parse(bad).is_err());
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = Manifest::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.toml"));
    }
}
