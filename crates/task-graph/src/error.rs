//! Error types for task graph operations.

use crate::TaskId;
use thiserror::Error;

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during task graph operations.
///
/// Construction never fails and malformed identifiers are passed through by
/// the query operations, so a dependency cycle is the only failure mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The dependency relation is not a DAG.
    #[error("Circular dependency detected involving task '{task}' ({title:?})")]
    CycleDetected {
        /// A task that participates in the cycle.
        task: TaskId,
        /// Title of that task, for human-readable reporting.
        title: String,
    },
}

impl Error {
    /// The task named by this error.
    #[must_use]
    pub const fn task(&self) -> &TaskId {
        match self {
            Self::CycleDetected { task, .. } => task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_names_task_and_title() {
        let err = Error::CycleDetected {
            task: TaskId::from_position(2),
            title: "Build UI".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Circular dependency detected involving task 'task-2' (\"Build UI\")"
        );
        assert_eq!(err.task().as_str(), "task-2");
    }
}
