//! The stock task record produced by task generation.

use crate::TaskNodeData;
use serde::{Deserialize, Serialize};

/// A unit of work: a short title, free-form details, and optional explicit
/// prerequisite references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Human-readable short label.
    pub title: String,
    /// Implementation notes; may be empty at graph-construction time.
    #[serde(default)]
    pub details: String,
    /// Explicit prerequisites, by title or `task-<n>` identifier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Create a task with the given title and no details.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the details text.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Add an explicit prerequisite reference.
    #[must_use]
    pub fn depends_on(mut self, reference: impl Into<String>) -> Self {
        self.dependencies.push(reference.into());
        self
    }
}

impl TaskNodeData for Task {
    fn title(&self) -> &str {
        &self.title
    }

    fn details(&self) -> &str {
        &self.details
    }

    fn explicit_dependencies(&self) -> &[String] {
        &self.dependencies
    }
}
