//! `scaffold`: inspect the dependency graph of generated project tasks.

mod cli;
mod commands;
mod config;
mod errors;
mod input;
mod tracing;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{Command, CommandContext};
use crate::config::ScaffoldConfig;
use crate::errors::{CliError, exit_code_for, render_error};
use crate::tracing::{LogLevel, TracingConfig, TracingFormat};
use std::io::Write;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "Application panicked: {panic_info}");
        let _ = writeln!(
            stderr,
            "Internal error occurred. Run with RUST_LOG=debug for more information."
        );
    }));

    let cli = cli::parse();
    std::process::exit(run(cli));
}

/// Run a parsed command line and return the process exit code
fn run(cli: Cli) -> i32 {
    let config = match ScaffoldConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let json_mode = cli.output_format == Some(OutputFormat::Json);
            let code = exit_code_for(&err);
            render_error(err, json_mode);
            return code;
        }
    };

    let output_format = cli
        .output_format
        .or(config.output.format)
        .unwrap_or_default();
    let json_mode = output_format == OutputFormat::Json;

    let tracing_config = TracingConfig {
        format: cli
            .log_format
            .or(config.log.format)
            .unwrap_or(TracingFormat::Compact),
        level: cli.level.or(config.log.level).unwrap_or(LogLevel::Warn).into(),
        filter: config.log.filter.clone(),
    };
    if let Err(err) = crate::tracing::init_tracing(tracing_config) {
        let err = CliError::config_with_help(
            err.to_string(),
            "Check the [log] section of the configuration and RUST_LOG",
        );
        let code = exit_code_for(&err);
        render_error(err, json_mode);
        return code;
    }

    let ctx = CommandContext {
        output_format,
        research: config.research,
    };
    let command: Command = cli.command.into();
    let span = command_span!(command.name(), file = %command.file().display());
    let _guard = span.enter();

    match commands::execute(command, &ctx) {
        Ok(outcome) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = stdout
                .write_all(outcome.output.as_bytes())
                .and_then(|()| stdout.flush())
            {
                ::tracing::debug!(%err, "Failed to write command output");
            }
            outcome.exit_code
        }
        Err(err) => {
            ::tracing::debug!(code = err.code(), "Command failed");
            let code = exit_code_for(&err);
            render_error(err, json_mode);
            code
        }
    }
}
