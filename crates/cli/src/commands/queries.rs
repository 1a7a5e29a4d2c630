//! Graph queries: order, roots, chain, ready, titles.

use super::{CommandContext, Outcome, entries, entry_lines, render};
use crate::errors::CliError;
use scaffold_task_graph::{DependencyGraph, TaskId, TaskNodeData};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;

pub fn order<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let order = graph.execution_order()?;
    let listed = entries(graph, &order);
    render(ctx, &listed, || entry_lines(&listed)).map(Outcome::ok)
}

pub fn roots<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let roots = graph.root_tasks();
    let listed = entries(graph, &roots);
    render(ctx, &listed, || entry_lines(&listed)).map(Outcome::ok)
}

pub fn chain<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    id: &TaskId,
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    if !graph.contains_task(id) {
        tracing::warn!(task = %id, "Unknown task; its dependency chain is empty");
    }
    let chain = graph.dependency_chain(id);
    let listed = entries(graph, &chain);
    render(ctx, &listed, || entry_lines(&listed)).map(Outcome::ok)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Readiness<'a> {
    id: &'a TaskId,
    ready: bool,
    waiting_on: Vec<TaskId>,
}

pub fn ready<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    id: &TaskId,
    completed: &[TaskId],
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let completed: HashSet<TaskId> = completed.iter().cloned().collect();
    let readiness = Readiness {
        id,
        ready: graph.is_task_ready(id, &completed),
        waiting_on: graph
            .dependencies_of(id)
            .into_iter()
            .filter(|dep| !completed.contains(dep))
            .collect(),
    };

    render(ctx, &readiness, || {
        if readiness.ready {
            format!("{id} is ready\n")
        } else {
            let waiting: Vec<&str> = readiness.waiting_on.iter().map(TaskId::as_str).collect();
            format!("{id} is waiting on {}\n", waiting.join(", "))
        }
    })
    .map(Outcome::ok)
}

pub fn titles<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    ids: &[String],
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let titles = graph.task_titles_for_ids(ids);
    render(ctx, &titles, || {
        titles.iter().fold(String::new(), |mut out, title| {
            let _ = writeln!(out, "{title}");
            out
        })
    })
    .map(Outcome::ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use scaffold_task_graph::Task;

    fn id(position: usize) -> TaskId {
        TaskId::from_position(position)
    }

    fn sample() -> DependencyGraph {
        DependencyGraph::build(vec![
            Task::new("Setup"),
            Task::new("Test after setup"),
            Task::new("Deploy after test after setup"),
        ])
    }

    fn json() -> CommandContext {
        CommandContext {
            output_format: OutputFormat::Json,
            ..CommandContext::default()
        }
    }

    #[test]
    fn test_chain_lists_dependencies_first() {
        let outcome = chain(&sample(), &id(3), &CommandContext::default()).unwrap();
        assert_eq!(outcome.output, "task-1\tSetup\ntask-2\tTest after setup\n");
    }

    #[test]
    fn test_chain_of_unknown_task_is_empty() {
        let outcome = chain(&sample(), &TaskId::from("task-99"), &json()).unwrap();
        assert_eq!(outcome.output.trim(), "[]");
    }

    #[test]
    fn test_ready_reports_missing_prerequisites() {
        let graph = sample();
        let outcome = ready(&graph, &id(3), &[id(1)], &CommandContext::default()).unwrap();
        assert_eq!(outcome.output, "task-3 is waiting on task-2\n");

        let outcome = ready(&graph, &id(3), &[id(1), id(2)], &json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(value["ready"], true);
        assert_eq!(value["waitingOn"], serde_json::json!([]));
    }

    #[test]
    fn test_titles_pass_unknown_ids_through() {
        let outcome = titles(
            &sample(),
            &["task-2".to_string(), "legacy-7".to_string()],
            &CommandContext::default(),
        )
        .unwrap();
        assert_eq!(outcome.output, "Test after setup\nlegacy-7\n");
    }
}
