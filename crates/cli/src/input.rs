//! Task list loading.

use crate::errors::CliError;
use scaffold_task_graph::Task;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Accepted shapes of a task file.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFile {
    List(Vec<Task>),
    Document { tasks: Vec<Task> },
}

/// Parse a task list from JSON text.
pub fn parse_tasks(source_name: &str, json: &str) -> Result<Vec<Task>, CliError> {
    let file: TaskFile = serde_json::from_str(json).map_err(|source| CliError::Input {
        source_name: source_name.to_string(),
        source,
    })?;
    Ok(match file {
        TaskFile::List(tasks) | TaskFile::Document { tasks } => tasks,
    })
}

/// Read a task list from `path`, or from stdin when `path` is `-`.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, CliError> {
    let (source_name, json) = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::io("<stdin>", e))?;
        ("<stdin>".to_string(), buffer)
    } else {
        let json = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        (path.display().to_string(), json)
    };

    let tasks = parse_tasks(&source_name, &json)?;
    tracing::debug!(source = %source_name, tasks = tasks.len(), "Loaded task list");
    Ok(tasks)
}
