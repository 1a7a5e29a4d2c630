//! Validation of task graph structure.
//!
//! A cycle is the only hard error. Everything else that weakens dependency
//! inference (empty or repeated titles, references that resolve to nothing) is
//! reported as a warning.

use crate::{DependencyGraph, TaskId, TaskNodeData};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Result of graph validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the graph admits an execution order.
    pub is_valid: bool,
    /// Human-readable errors; non-empty exactly when `is_valid` is false.
    pub errors: Vec<String>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// When the validation ran.
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid(warnings: Vec<String>) -> Self {
        Self {
            is_valid: true,
            errors: vec![],
            warnings,
            timestamp: Utc::now(),
        }
    }

    /// Create an invalid result with errors.
    #[must_use]
    pub fn invalid(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            warnings,
            timestamp: Utc::now(),
        }
    }
}

impl<T: TaskNodeData> DependencyGraph<T> {
    /// Validate the graph structure.
    ///
    /// Runs [`execution_order`](Self::execution_order); a cycle makes the
    /// result invalid with the cycle message as its error.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut warnings = self.title_warnings();
        warnings.extend(
            self.unresolved_references()
                .iter()
                .map(|(task, reference)| {
                    format!("Task '{task}' references unknown task {reference:?}")
                }),
        );

        match self.execution_order() {
            Ok(_) => ValidationResult::valid(warnings),
            Err(err) => {
                warn!(%err, "Task dependency graph is not acyclic");
                warnings.extend(self.cycles().iter().map(|members| {
                    let members: Vec<&str> = members.iter().map(TaskId::as_str).collect();
                    format!("Tasks {} form a dependency cycle", members.join(", "))
                }));
                ValidationResult::invalid(vec![err.to_string()], warnings)
            }
        }
    }

    fn title_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut first_with_title: HashMap<&str, &TaskId> = HashMap::new();

        for node in self.iter_nodes() {
            let title = node.task.title().trim();
            if title.is_empty() {
                warnings.push(format!(
                    "Task '{}' has an empty title and cannot take part in dependency inference",
                    node.id
                ));
                continue;
            }
            if let Some(first) = first_with_title.get(title) {
                warnings.push(format!(
                    "Task '{}' repeats the title of task '{first}': {title:?}",
                    node.id
                ));
            } else {
                first_with_title.insert(title, &node.id);
            }
        }

        warnings
    }
}
