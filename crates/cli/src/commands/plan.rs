//! `scaffold plan`

use super::{CommandContext, Outcome, TaskEntry, entries, render};
use crate::errors::CliError;
use scaffold_research::ResearchPlan;
use scaffold_task_graph::{DependencyGraph, TaskNodeData};
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanView<'a> {
    max_concurrency: usize,
    levels: Vec<Vec<TaskEntry<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<&'a str>,
}

pub fn plan<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    max_concurrency: Option<usize>,
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let research_plan = ResearchPlan::from_graph(graph);
    let view = PlanView {
        max_concurrency: max_concurrency.unwrap_or(ctx.research.max_concurrency),
        levels: research_plan
            .levels()
            .iter()
            .map(|level| entries(graph, level))
            .collect(),
        fallback: research_plan.fallback_reason(),
    };

    render(ctx, &view, || describe(&view)).map(Outcome::ok)
}

fn describe(view: &PlanView<'_>) -> String {
    let mut out = String::new();
    if let Some(reason) = view.fallback {
        let _ = writeln!(out, "fallback: {reason}");
    }
    if view.max_concurrency == 0 {
        out.push_str("max concurrency: unlimited\n");
    } else {
        let _ = writeln!(out, "max concurrency: {}", view.max_concurrency);
    }
    for (index, level) in view.levels.iter().enumerate() {
        let _ = writeln!(out, "level {}", index + 1);
        for entry in level {
            let _ = writeln!(out, "  {}\t{}", entry.id, entry.title);
        }
    }
    out
}
