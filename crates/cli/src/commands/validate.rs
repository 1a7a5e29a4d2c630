//! `scaffold validate`

use super::{CommandContext, Outcome, render};
use crate::errors::{CliError, EXIT_INVALID, EXIT_OK};
use scaffold_task_graph::{DependencyGraph, TaskNodeData, ValidationResult};
use std::fmt::Write;

pub fn validate<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    ctx: &CommandContext,
) -> Result<Outcome, CliError> {
    let result = graph.validate();
    tracing::info!(
        valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validated task graph"
    );

    let output = render(ctx, &result, || describe(&result))?;
    Ok(Outcome {
        output,
        exit_code: if result.is_valid {
            EXIT_OK
        } else {
            EXIT_INVALID
        },
    })
}

fn describe(result: &ValidationResult) -> String {
    let mut out = String::from(if result.is_valid { "valid\n" } else { "invalid\n" });
    for error in &result.errors {
        let _ = writeln!(out, "error: {error}");
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}
