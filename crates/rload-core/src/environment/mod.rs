//! Runtime environment seam.
//!
//! The loader never touches the outside world directly: it asks a
//! `ResourceInjector` to attach a resource and a `CapabilityRegistry` whether
//! a named capability is already present. `Document` is the in-memory
//! environment the bundled injectors attach into.

mod any;
mod document;
mod fs;
mod http;

use std::collections::HashSet;
use std::future::Future;
use std::sync::RwLock;

use crate::descriptor::ResourceDescriptor;

pub use any::AnyInjector;
pub use document::{Document, InjectedResource};
pub use fs::FsInjector;
pub use http::HttpInjector;

/// Failure reported by the environment while attaching a resource.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("unsupported url: {0}")]
    UnsupportedUrl(String),
    #[error("{0}")]
    Other(String),
}

/// Attaches a resource to the runtime and resolves once it signalled completion.
pub trait ResourceInjector: Send + Sync + 'static {
    fn inject(
        &self,
        resource: &ResourceDescriptor,
    ) -> impl Future<Output = Result<(), InjectError>> + Send;
}

/// Answers whether a named capability is already available in the runtime.
pub trait CapabilityRegistry: Send + Sync {
    fn is_present(&self, name: &str) -> bool;
}

/// Plain set of declared capability names.
#[derive(Debug, Default)]
pub struct Capabilities {
    names: RwLock<HashSet<String>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&self, name: impl Into<String>) {
        self.names
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into());
    }
}

impl<S: Into<String>> FromIterator<S> for Capabilities {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl CapabilityRegistry for Capabilities {
    fn is_present(&self, name: &str) -> bool {
        self.names
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_declare_and_query() {
        let caps: Capabilities = ["jQuery"].into_iter().collect();
        assert!(caps.is_present("jQuery"));
        assert!(!caps.is_present("marked"));
        caps.declare("marked");
        assert!(caps.is_present("marked"));
    }
}
