use std::sync::{Arc, RwLock};

use super::CapabilityRegistry;
use crate::descriptor::{ResourceDescriptor, ResourceKind};

/// A resource that was attached to the document.
#[derive(Debug, Clone)]
pub struct InjectedResource {
    pub name: String,
    pub url: String,
    pub kind: ResourceKind,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct DocumentInner {
    resources: Vec<InjectedResource>,
    declared: Vec<String>,
}

/// In-memory runtime document. Cheap to clone; clones share the same contents.
///
/// A name counts as present once a resource with that name was attached or
/// the name was declared by the host.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<DocumentInner>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a loaded resource (the equivalent of appending a script/style tag).
    pub fn attach(&self, resource: &ResourceDescriptor, content: Vec<u8>) {
        let injected = InjectedResource {
            name: resource.name.clone(),
            url: resource.url.clone(),
            kind: resource.resolved_kind(),
            content,
        };
        tracing::debug!(
            name = %injected.name,
            kind = ?injected.kind,
            bytes = injected.content.len(),
            "attached resource"
        );
        self.write().resources.push(injected);
    }

    /// Mark a capability as provided by the host rather than by a loaded resource.
    pub fn declare(&self, name: impl Into<String>) {
        self.write().declared.push(name.into());
    }

    /// Snapshot of attached resources in attachment order.
    pub fn resources(&self) -> Vec<InjectedResource> {
        self.read().resources.clone()
    }

    pub fn len(&self) -> usize {
        self.read().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, DocumentInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, DocumentInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CapabilityRegistry for Document {
    fn is_present(&self, name: &str) -> bool {
        let inner = self.read();
        inner.declared.iter().any(|n| n == name) || inner.resources.iter().any(|r| r.name == name)
    }
}
