//! Injector reading resources from the local filesystem.

use std::path::{Path, PathBuf};

use super::{Document, InjectError, ResourceInjector};
use crate::descriptor::ResourceDescriptor;

/// Reads `file://` urls or paths relative to `root` and attaches them to a `Document`.
#[derive(Debug, Clone)]
pub struct FsInjector {
    root: PathBuf,
    document: Document,
}

impl FsInjector {
    pub fn new(root: impl Into<PathBuf>, document: Document) -> Self {
        Self {
            root: root.into(),
            document,
        }
    }

    /// Map a resource url to a path on disk.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, InjectError> {
        if url.starts_with("file:") {
            let parsed =
                url::Url::parse(url).map_err(|_| InjectError::UnsupportedUrl(url.to_string()))?;
            return parsed
                .to_file_path()
                .map_err(|_| InjectError::UnsupportedUrl(url.to_string()));
        }
        if url.contains("://") {
            return Err(InjectError::UnsupportedUrl(url.to_string()));
        }
        let relative = Path::new(url.trim_start_matches('/'));
        Ok(self.root.join(relative))
    }
}

impl ResourceInjector for FsInjector {
    async fn inject(&self, resource: &ResourceDescriptor) -> Result<(), InjectError> {
        let path = self.resolve(&resource.url)?;
        let content = tokio::fs::read(&path).await?;
        self.document.attach(resource, content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::CapabilityRegistry;

    #[test]
    fn resolve_relative_and_file_urls() {
        let inj = FsInjector::new("/srv/static", Document::new());
        assert_eq!(inj.resolve("js/app.js").unwrap(), PathBuf::from("/srv/static/js/app.js"));
        assert_eq!(inj.resolve("/js/app.js").unwrap(), PathBuf::from("/srv/static/js/app.js"));
        assert_eq!(inj.resolve("file:///tmp/a.css").unwrap(), PathBuf::from("/tmp/a.css"));
        assert!(matches!(
            inj.resolve("https://cdn.example/a.js"),
            Err(InjectError::UnsupportedUrl(_))
        ));
    }

    #[tokio::test]
    async fn inject_reads_file_into_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), b"window.app = 1;").unwrap();
        let doc = Document::new();
        let inj = FsInjector::new(dir.path(), doc.clone());

        inj.inject(&ResourceDescriptor::new("app.js", "app")).await.unwrap();
        assert!(doc.is_present("app"));
        assert_eq!(doc.resources()[0].content, b"window.app = 1;");

        let err = inj
            .inject(&ResourceDescriptor::new("missing.js", "missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, InjectError::Io(_)));
    }
}
