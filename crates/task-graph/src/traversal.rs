//! Traversal algorithms: execution order, execution levels, dependency chains
//! and cycle discovery.
//!
//! Depth-first walks use an explicit stack so very large task lists cannot
//! exhaust the call stack.

use crate::{DependencyGraph, Error, Result, TaskId, TaskNodeData};
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Groups of tasks that can be processed in parallel.
///
/// Every task in group N has all of its prerequisites in groups before N.
pub type ExecutionLevels = Vec<Vec<TaskId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

impl<T: TaskNodeData> DependencyGraph<T> {
    /// Order all tasks so that every task comes after all of its
    /// prerequisites.
    ///
    /// Tasks are tried as traversal roots in input order and prerequisites in
    /// discovery order, which makes the result deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] naming a task on the cycle when the
    /// dependency relation is not acyclic.
    pub fn execution_order(&self) -> Result<Vec<TaskId>> {
        let count = self.task_count();
        let mut state = vec![VisitState::Unvisited; count];
        let mut order = Vec::with_capacity(count);
        // Each frame is a node and the position of the next prerequisite to visit.
        let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

        for root in self.petgraph().node_indices() {
            if state[root.index()] != VisitState::Unvisited {
                continue;
            }
            state[root.index()] = VisitState::InProgress;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let next = self.prerequisite_indices(node).get(top.1).copied();
                top.1 += 1;

                match next {
                    Some(dep) => match state[dep.index()] {
                        VisitState::Unvisited => {
                            state[dep.index()] = VisitState::InProgress;
                            stack.push((dep, 0));
                        }
                        VisitState::InProgress => return Err(self.cycle_error(dep)),
                        VisitState::Done => {}
                    },
                    None => {
                        state[node.index()] = VisitState::Done;
                        order.push(self.petgraph()[node].id.clone());
                        stack.pop();
                    }
                }
            }
        }

        Ok(order)
    }

    /// Group tasks into levels that can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] when the graph contains a cycle.
    pub fn execution_levels(&self) -> Result<ExecutionLevels> {
        let order = self.execution_order()?;
        let mut depth = vec![0_usize; self.task_count()];
        let mut levels: ExecutionLevels = Vec::new();

        for id in order {
            let Some(idx) = self.index_of(&id) else {
                continue;
            };
            let level = self
                .prerequisite_indices(idx)
                .iter()
                .map(|dep| depth[dep.index()] + 1)
                .max()
                .unwrap_or(0);
            depth[idx.index()] = level;

            if level >= levels.len() {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(id);
        }

        Ok(levels)
    }

    /// All transitive prerequisites of `id`, dependencies first, excluding
    /// `id` itself.
    ///
    /// Each task is expanded at most once, so the walk terminates on cyclic
    /// graphs instead of failing. Unknown identifiers yield an empty chain.
    #[must_use]
    pub fn dependency_chain(&self, id: &TaskId) -> Vec<TaskId> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.task_count()];
        visited[start.index()] = true;
        let mut chain = Vec::new();
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let next = self.prerequisite_indices(node).get(top.1).copied();
            top.1 += 1;

            match next {
                Some(dep) if !visited[dep.index()] => {
                    visited[dep.index()] = true;
                    stack.push((dep, 0));
                }
                Some(_) => {}
                None => {
                    stack.pop();
                    if node != start {
                        chain.push(node);
                    }
                }
            }
        }

        self.ids_of(&chain)
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(self.petgraph())
    }

    /// Every dependency cycle, as the member tasks of each strongly connected
    /// component in input order. Acyclic graphs yield an empty list.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let graph = self.petgraph();
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || graph.contains_edge(component[0], component[0])
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        cycles.sort_unstable();
        cycles.iter().map(|component| self.ids_of(component)).collect()
    }

    fn cycle_error(&self, idx: NodeIndex) -> Error {
        let node = &self.petgraph()[idx];
        debug!(task = %node.id, "Dependency cycle reached");
        Error::CycleDetected {
            task: node.id.clone(),
            title: node.task.title().to_string(),
        }
    }
}
