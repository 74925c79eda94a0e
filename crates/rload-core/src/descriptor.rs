//! Resource descriptors and load results.
//!
//! A `ResourceDescriptor` identifies one loadable unit (script or stylesheet);
//! its `url` is the cache key used by the loader.

use serde::{Deserialize, Serialize};

/// Scheduling class controlling relative load timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Loaded immediately.
    #[default]
    High,
    /// Loaded after the medium-tier delay.
    Medium,
    /// Loaded after the low-tier delay.
    Low,
}

/// What the environment attaches the resource as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Style,
}

impl ResourceKind {
    /// Infer the kind from the url path: `.css` is a stylesheet, anything else a script.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".css") {
            ResourceKind::Style
        } else {
            ResourceKind::Script
        }
    }
}

/// Request record describing a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub url: String,
    pub name: String,
    /// Required resources are fatal when retries are exhausted; optional ones degrade.
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Explicit kind; inferred from the url when absent.
    #[serde(default)]
    pub kind: Option<ResourceKind>,
}

fn default_required() -> bool {
    true
}

impl ResourceDescriptor {
    /// Required, high-priority descriptor.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            required: true,
            priority: Priority::High,
            kind: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn resolved_kind(&self) -> ResourceKind {
        self.kind.unwrap_or_else(|| ResourceKind::from_url(&self.url))
    }
}

/// Outcome of a completed load, as kept in the loader cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRecord {
    pub name: String,
    pub success: bool,
}

/// Per-descriptor result of a retried or batched load.
///
/// `success == false` only occurs for optional resources whose retries ran out;
/// `error` then carries the last failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<LoadRecord> for LoadOutcome {
    fn from(record: LoadRecord) -> Self {
        Self {
            name: record.name,
            success: record.success,
            error: None,
        }
    }
}
