//! Command execution.
//!
//! Every command loads a task list, builds the dependency graph and renders
//! one query result as text or JSON. Rendering returns a string; the caller
//! decides where it goes.

mod plan;
mod queries;
mod validate;

use crate::cli::OutputFormat;
use crate::errors::{CliError, EXIT_OK};
use crate::input::load_tasks;
use scaffold_research::ResearchConfig;
use scaffold_task_graph::{DependencyGraph, TaskId, TaskNodeData};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A parsed command ready for execution
#[derive(Debug, Clone)]
pub enum Command {
    Order {
        file: PathBuf,
    },
    Validate {
        file: PathBuf,
    },
    Roots {
        file: PathBuf,
    },
    Chain {
        file: PathBuf,
        id: TaskId,
    },
    Ready {
        file: PathBuf,
        id: TaskId,
        completed: Vec<TaskId>,
    },
    Titles {
        file: PathBuf,
        ids: Vec<String>,
    },
    Plan {
        file: PathBuf,
        max_concurrency: Option<usize>,
    },
}

impl Command {
    /// Subcommand name, used in spans and logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Order { .. } => "order",
            Self::Validate { .. } => "validate",
            Self::Roots { .. } => "roots",
            Self::Chain { .. } => "chain",
            Self::Ready { .. } => "ready",
            Self::Titles { .. } => "titles",
            Self::Plan { .. } => "plan",
        }
    }

    /// The task list the command reads
    #[must_use]
    pub fn file(&self) -> &Path {
        match self {
            Self::Order { file }
            | Self::Validate { file }
            | Self::Roots { file }
            | Self::Chain { file, .. }
            | Self::Ready { file, .. }
            | Self::Titles { file, .. }
            | Self::Plan { file, .. } => file,
        }
    }
}

/// Settings resolved from flags and the configuration file
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub output_format: OutputFormat,
    pub research: ResearchConfig,
}

/// Rendered result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub exit_code: i32,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            exit_code: EXIT_OK,
        }
    }
}

/// Execute a command
pub fn execute(command: Command, ctx: &CommandContext) -> Result<Outcome, CliError> {
    let tasks = load_tasks(command.file())?;
    let graph = DependencyGraph::build(tasks);
    tracing::debug!(
        command = command.name(),
        tasks = graph.task_count(),
        "Built dependency graph"
    );

    match command {
        Command::Order { .. } => queries::order(&graph, ctx),
        Command::Validate { .. } => validate::validate(&graph, ctx),
        Command::Roots { .. } => queries::roots(&graph, ctx),
        Command::Chain { id, .. } => queries::chain(&graph, &id, ctx),
        Command::Ready { id, completed, .. } => queries::ready(&graph, &id, &completed, ctx),
        Command::Titles { ids, .. } => queries::titles(&graph, &ids, ctx),
        Command::Plan {
            max_concurrency, ..
        } => plan::plan(&graph, max_concurrency, ctx),
    }
}

/// A task as it appears in command output
#[derive(Debug, Serialize)]
struct TaskEntry<'a> {
    id: &'a TaskId,
    title: &'a str,
}

fn entries<'a, T: TaskNodeData>(
    graph: &'a DependencyGraph<T>,
    ids: &'a [TaskId],
) -> Vec<TaskEntry<'a>> {
    ids.iter()
        .map(|id| TaskEntry {
            id,
            title: graph.task(id).map_or("", |task| task.title()),
        })
        .collect()
}

fn entry_lines(entries: &[TaskEntry<'_>]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\t{}\n", entry.id, entry.title))
        .collect()
}

/// Pick the JSON or text rendering according to the output format
fn render<S: Serialize>(
    ctx: &CommandContext,
    value: &S,
    text: impl FnOnce() -> String,
) -> Result<String, CliError> {
    match ctx.output_format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|source| CliError::Encode { source }),
        OutputFormat::Text => Ok(text()),
    }
}
