//! Dependency graph construction and queries, backed by petgraph.
//!
//! A graph is built once per task-list snapshot and never mutated afterwards;
//! a changed task list means a new [`DependencyGraph`].

use crate::inference::infer_prerequisites;
use crate::{Task, TaskId, TaskNodeData};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, IntoNodeReferences};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A node in the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    /// Synthetic identifier assigned from the input position.
    pub id: TaskId,
    /// The task data.
    pub task: T,
}

/// Immutable task dependency graph for one batch of tasks.
///
/// Node `i` holds the task at input position `i` and is identified as
/// `task-<i+1>`. Edges run from a prerequisite to the task that depends on it.
#[derive(Debug, Clone)]
pub struct DependencyGraph<T: TaskNodeData = Task> {
    graph: DiGraph<GraphNode<T>, ()>,
    /// Prerequisites of each node, de-duplicated, in discovery order.
    prerequisites: Vec<Vec<NodeIndex>>,
    /// Explicit references that did not resolve to a task of the batch.
    unresolved: Vec<(TaskId, String)>,
}

impl<T: TaskNodeData> DependencyGraph<T> {
    /// Build the graph for an ordered batch of tasks.
    ///
    /// Prerequisites are inferred lexically from the titles, then explicit
    /// references are resolved by `task-<n>` identifier or by title (the first
    /// task carrying a title wins). Construction never fails: unmatched text
    /// simply yields no edge, and unresolved references are kept as warnings
    /// for [`validate`](Self::validate).
    pub fn build(tasks: impl IntoIterator<Item = T>) -> Self {
        let tasks: Vec<T> = tasks.into_iter().collect();
        let mut unresolved = Vec::new();

        let prerequisites: Vec<Vec<usize>> = {
            let title_index = title_index(&tasks);
            infer_prerequisites(&tasks)
                .into_iter()
                .zip(&tasks)
                .enumerate()
                .map(|(index, (mut deps, task))| {
                    for reference in task.explicit_dependencies() {
                        match resolve_reference(reference, &title_index, tasks.len()) {
                            Some(dep) if dep == index => {
                                debug!(task = %TaskId::from_index(index), reference, "Ignoring self reference");
                            }
                            Some(dep) => deps.push(dep),
                            None => unresolved.push((TaskId::from_index(index), reference.clone())),
                        }
                    }
                    let mut seen = HashSet::new();
                    deps.retain(|dep| seen.insert(*dep));
                    deps
                })
                .collect()
        };

        let edge_count = prerequisites.iter().map(Vec::len).sum();
        let mut graph = DiGraph::with_capacity(tasks.len(), edge_count);
        for (index, task) in tasks.into_iter().enumerate() {
            graph.add_node(GraphNode {
                id: TaskId::from_index(index),
                task,
            });
        }
        for (index, deps) in prerequisites.iter().enumerate() {
            for &dep in deps {
                graph.add_edge(NodeIndex::new(dep), NodeIndex::new(index), ());
                debug!(
                    task = %TaskId::from_index(index),
                    prerequisite = %TaskId::from_index(dep),
                    "Added dependency edge"
                );
            }
        }

        debug!(
            tasks = graph.node_count(),
            edges = edge_count,
            unresolved = unresolved.len(),
            "Built task dependency graph"
        );

        Self {
            graph,
            prerequisites: prerequisites
                .into_iter()
                .map(|deps| deps.into_iter().map(NodeIndex::new).collect())
                .collect(),
            unresolved,
        }
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All task identifiers in input order.
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.graph.node_weights().map(|node| &node.id)
    }

    /// Iterate over all nodes in input order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &GraphNode<T>> {
        self.graph.node_references().map(|(_, node)| node)
    }

    /// Get a task node by identifier.
    #[must_use]
    pub fn node(&self, id: &TaskId) -> Option<&GraphNode<T>> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Get a task by identifier.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&T> {
        self.node(id).map(|node| &node.task)
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.index_of(id).is_some()
    }

    /// Direct prerequisites of a task, in discovery order.
    ///
    /// Unknown identifiers have no prerequisites.
    #[must_use]
    pub fn dependencies_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.index_of(id)
            .map(|idx| self.ids_of(&self.prerequisites[idx.index()]))
            .unwrap_or_default()
    }

    /// The full adjacency structure: each task with its direct prerequisites,
    /// in input order.
    #[must_use]
    pub fn adjacency(&self) -> Vec<(TaskId, Vec<TaskId>)> {
        self.graph
            .node_references()
            .map(|(idx, node)| (node.id.clone(), self.ids_of(&self.prerequisites[idx.index()])))
            .collect()
    }

    /// Tasks with no prerequisites, in input order. These can start first.
    #[must_use]
    pub fn root_tasks(&self) -> Vec<TaskId> {
        self.graph
            .node_references()
            .filter(|(idx, _)| self.prerequisites[idx.index()].is_empty())
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    /// Tasks that no other task depends on, in input order.
    #[must_use]
    pub fn terminal_tasks(&self) -> Vec<TaskId> {
        self.graph
            .node_references()
            .filter(|(idx, _)| {
                self.graph
                    .neighbors_directed(*idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    /// All tasks that transitively depend on `id`, in input order.
    ///
    /// Terminates on cyclic graphs; a task on a cycle through `id` is not
    /// reported as its own dependent.
    #[must_use]
    pub fn dependents_of(&self, id: &TaskId) -> Vec<TaskId> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };

        let mut bfs = Bfs::new(&self.graph, start);
        let mut found = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                found.push(idx);
            }
        }
        found.sort_unstable();
        self.ids_of(&found)
    }

    /// Whether every prerequisite of `id` is in `completed`.
    ///
    /// A task without prerequisites, including an unknown identifier, is
    /// always ready.
    #[must_use]
    pub fn is_task_ready(&self, id: &TaskId, completed: &HashSet<TaskId>) -> bool {
        self.index_of(id).is_none_or(|idx| {
            self.prerequisites[idx.index()]
                .iter()
                .all(|dep| completed.contains(&self.graph[*dep].id))
        })
    }

    /// Resolve identifiers back to task titles.
    ///
    /// Identifiers that do not name a task of this graph are returned
    /// unchanged, so identifiers from other numbering schemes pass through.
    pub fn task_titles_for_ids<I, S>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                self.task(&TaskId::from(raw))
                    .map_or_else(|| raw.to_string(), |task| task.title().to_string())
            })
            .collect()
    }

    /// Explicit references that did not resolve, as `(task, reference)` pairs.
    #[must_use]
    pub fn unresolved_references(&self) -> &[(TaskId, String)] {
        &self.unresolved
    }

    pub(crate) fn index_of(&self, id: &TaskId) -> Option<NodeIndex> {
        id.index()
            .filter(|&index| index < self.graph.node_count())
            .map(NodeIndex::new)
    }

    pub(crate) fn prerequisite_indices(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.prerequisites[idx.index()]
    }

    pub(crate) fn petgraph(&self) -> &DiGraph<GraphNode<T>, ()> {
        &self.graph
    }

    pub(crate) fn ids_of(&self, indices: &[NodeIndex]) -> Vec<TaskId> {
        indices
            .iter()
            .map(|idx| self.graph[*idx].id.clone())
            .collect()
    }
}

impl<T: TaskNodeData> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::build(Vec::new())
    }
}

/// Map trimmed, non-empty titles to the index of the first task carrying them.
fn title_index<T: TaskNodeData>(tasks: &[T]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (position, task) in tasks.iter().enumerate() {
        let title = task.title().trim();
        if !title.is_empty() {
            index.entry(title).or_insert(position);
        }
    }
    index
}

/// Resolve an explicit reference as a `task-<n>` identifier first, then as a
/// title.
fn resolve_reference(reference: &str, titles: &HashMap<&str, usize>, len: usize) -> Option<usize> {
    let reference = reference.trim();
    TaskId::from(reference)
        .index()
        .filter(|&index| index < len)
        .or_else(|| titles.get(reference).copied())
}
