//! Task dependency graph for scaffold.
//!
//! Upstream generation produces an ordered batch of tasks (a title plus free-form
//! details). This crate turns such a batch into an immutable dependency graph:
//! prerequisites are inferred from lexical cues in the task titles ("after X",
//! "X then ...", "requires the X", ...) and, optionally, from explicit
//! references carried by the tasks themselves.
//!
//! The graph answers the questions the research step needs:
//!
//! - in which order tasks should be processed (dependencies first),
//! - whether the dependency relation is cyclic,
//! - which tasks can start immediately, and what a task transitively needs.
//!
//! # Key Types
//!
//! - [`DependencyGraph`]: the immutable graph built from one task-list snapshot
//! - [`TaskNodeData`]: trait that task types implement to be stored in the graph
//! - [`Task`]: the stock task record (`title`, `details`, `dependencies`)
//! - [`TaskId`]: the synthetic `task-<n>` identifier assigned by position
//! - [`ValidationResult`]: structured outcome of [`DependencyGraph::validate`]
//!
//! # Example
//!
//! ```
//! use scaffold_task_graph::{DependencyGraph, Task, TaskId};
//!
//! let tasks = vec![
//!     Task::new("Setup project"),
//!     Task::new("After setup project, build UI"),
//! ];
//! let graph = DependencyGraph::build(tasks);
//!
//! assert_eq!(graph.root_tasks(), vec![TaskId::from_position(1)]);
//! let order = graph.execution_order().unwrap();
//! assert_eq!(order, vec![TaskId::from_position(1), TaskId::from_position(2)]);
//! ```

mod error;
mod graph;
mod id;
mod inference;
mod task;
mod traversal;
mod validation;

pub use error::{Error, Result};
pub use graph::{DependencyGraph, GraphNode};
pub use id::TaskId;
pub use inference::PREREQUISITE_KEYWORDS;
pub use task::Task;
pub use traversal::ExecutionLevels;
pub use validation::ValidationResult;

/// Trait for task data that can be stored in a [`DependencyGraph`].
///
/// Only the title takes part in lexical dependency inference. Explicit
/// references are optional and default to none.
pub trait TaskNodeData {
    /// Human-readable short label of the task.
    fn title(&self) -> &str;

    /// Free-form implementation notes. Empty by default.
    fn details(&self) -> &str {
        ""
    }

    /// Explicit prerequisite references, by title or by `task-<n>` identifier.
    ///
    /// References that do not resolve to another task of the same batch are
    /// dropped during construction and surface as validation warnings.
    fn explicit_dependencies(&self) -> &[String] {
        &[]
    }
}
