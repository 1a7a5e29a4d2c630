use crate::commands::Command;
use crate::config::CONFIG_ENV;
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand, ValueEnum};
use scaffold_task_graph::TaskId;
use serde::Deserialize;
use std::path::PathBuf;

/// Output format for command results
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, ValueEnum, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one record per line
    #[default]
    Text,
    /// JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Json => "json",
        };
        write!(f, "{s}")
    }
}

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Inspect the dependency graph of generated project tasks")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level [default: warn]",
        value_enum
    )]
    pub level: Option<LogLevel>,

    #[arg(long, global = true, help = "Log output format", value_enum)]
    pub log_format: Option<TracingFormat>,

    #[arg(
        short = 'o',
        long = "output",
        global = true,
        help = "Result output format [default: text]",
        value_enum
    )]
    pub output_format: Option<OutputFormat>,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = CONFIG_ENV,
        help = "Configuration file [default: ./scaffold.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Print tasks in dependency order, prerequisites first")]
    Order {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
    },
    #[command(about = "Check the graph for cycles and suspicious references")]
    Validate {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
    },
    #[command(about = "Print tasks without prerequisites")]
    Roots {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
    },
    #[command(about = "Print every transitive prerequisite of a task")]
    Chain {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
        #[arg(help = "Task identifier, e.g. task-3")]
        id: String,
    },
    #[command(about = "Check whether a task's prerequisites are all completed")]
    Ready {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
        #[arg(help = "Task identifier, e.g. task-3")]
        id: String,
        #[arg(
            long,
            num_args = 1..,
            value_delimiter = ',',
            help = "Identifiers of completed tasks"
        )]
        completed: Vec<String>,
    },
    #[command(about = "Resolve task identifiers to titles")]
    Titles {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
        #[arg(required = true, help = "Task identifiers")]
        ids: Vec<String>,
    },
    #[command(about = "Show the research plan: levels of tasks researched together")]
    Plan {
        #[arg(help = "Task list (JSON); '-' reads stdin")]
        file: PathBuf,
        #[arg(long, help = "Research jobs per level (0 = unlimited)")]
        max_concurrency: Option<usize>,
    },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Order { file } => Self::Order { file },
            Commands::Validate { file } => Self::Validate { file },
            Commands::Roots { file } => Self::Roots { file },
            Commands::Chain { file, id } => Self::Chain {
                file,
                id: TaskId::from(id),
            },
            Commands::Ready {
                file,
                id,
                completed,
            } => Self::Ready {
                file,
                id: TaskId::from(id),
                completed: completed.into_iter().map(TaskId::from).collect(),
            },
            Commands::Titles { file, ids } => Self::Titles { file, ids },
            Commands::Plan {
                file,
                max_concurrency,
            } => Self::Plan {
                file,
                max_concurrency,
            },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["scaffold", "order", "tasks.json"]).unwrap();

        assert!(cli.level.is_none());
        assert!(cli.log_format.is_none());
        assert!(cli.output_format.is_none());
        assert!(matches!(cli.command, Commands::Order { .. }));
    }

    #[test]
    fn test_cli_log_level_parsing() {
        let cli =
            Cli::try_parse_from(["scaffold", "--level", "trace", "roots", "t.json"]).unwrap();
        assert_eq!(cli.level, Some(LogLevel::Trace));

        let cli = Cli::try_parse_from(["scaffold", "roots", "t.json", "-L", "error"]).unwrap();
        assert_eq!(cli.level, Some(LogLevel::Error));
    }

    #[test]
    fn test_cli_global_output_flag() {
        let cli = Cli::try_parse_from(["scaffold", "validate", "t.json", "-o", "json"]).unwrap();
        assert_eq!(cli.output_format, Some(OutputFormat::Json));

        let cli = Cli::try_parse_from([
            "scaffold",
            "--log-format",
            "json",
            "--output",
            "text",
            "order",
            "t.json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, Some(TracingFormat::Json));
        assert_eq!(cli.output_format, Some(OutputFormat::Text));
    }

    #[test]
    fn test_ready_completed_values() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "ready",
            "t.json",
            "task-3",
            "--completed",
            "task-1",
            "task-2",
        ])
        .unwrap();
        let command: Command = cli.command.into();
        match command {
            Command::Ready { id, completed, .. } => {
                assert_eq!(id, TaskId::from_position(3));
                assert_eq!(
                    completed,
                    vec![TaskId::from_position(1), TaskId::from_position(2)]
                );
            }
            other => panic!("Expected Ready command, got {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "scaffold",
            "ready",
            "t.json",
            "task-3",
            "--completed",
            "task-1,task-2",
        ])
        .unwrap();
        let Commands::Ready { completed, .. } = cli.command else {
            panic!("Expected Ready command");
        };
        assert_eq!(completed, vec!["task-1", "task-2"]);
    }

    #[test]
    fn test_ready_without_completed() {
        let cli = Cli::try_parse_from(["scaffold", "ready", "t.json", "task-1"]).unwrap();
        let Commands::Ready { completed, .. } = cli.command else {
            panic!("Expected Ready command");
        };
        assert!(completed.is_empty());
    }

    #[test]
    fn test_titles_requires_ids() {
        assert!(Cli::try_parse_from(["scaffold", "titles", "t.json"]).is_err());
    }

    #[test]
    fn test_plan_concurrency_override() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "plan",
            "t.json",
            "--max-concurrency",
            "0",
        ])
        .unwrap();
        let command: Command = cli.command.into();
        assert!(matches!(
            command,
            Command::Plan {
                max_concurrency: Some(0),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let result = Cli::try_parse_from(["scaffold", "--level", "loud", "order", "t.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["scaffold"]).is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["scaffold", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
