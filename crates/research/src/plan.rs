//! Research ordering derived from a dependency graph.

use scaffold_task_graph::{DependencyGraph, TaskId, TaskNodeData};
use serde::Serialize;
use tracing::{debug, warn};

/// The order in which tasks get researched.
///
/// Tasks inside one level are independent of each other; every prerequisite
/// of a task sits in an earlier level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPlan {
    levels: Vec<Vec<TaskId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

impl ResearchPlan {
    /// Plan research for every task of `graph`.
    ///
    /// When the graph has a cycle there is no valid order; the plan then
    /// keeps the original task order and researches one task at a time, and
    /// [`fallback_reason`](Self::fallback_reason) carries the cycle message.
    #[must_use]
    pub fn from_graph<T: TaskNodeData>(graph: &DependencyGraph<T>) -> Self {
        match graph.execution_levels() {
            Ok(levels) => {
                debug!(
                    tasks = graph.task_count(),
                    levels = levels.len(),
                    "Planned research in dependency order"
                );
                Self {
                    levels,
                    fallback: None,
                }
            }
            Err(err) => {
                warn!(%err, "Falling back to original task order for research");
                Self {
                    levels: graph.ids().map(|id| vec![id.clone()]).collect(),
                    fallback: Some(err.to_string()),
                }
            }
        }
    }

    /// The planned levels.
    #[must_use]
    pub fn levels(&self) -> &[Vec<TaskId>] {
        &self.levels
    }

    /// Why the plan fell back to the original order, if it did.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Whether the plan fell back to the original order.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// All planned tasks, level by level.
    pub fn order(&self) -> impl Iterator<Item = &TaskId> {
        self.levels.iter().flatten()
    }

    /// Number of planned tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Whether nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
