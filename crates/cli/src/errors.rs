//! CLI error types with miette diagnostics and exit-code mapping.

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Successful run
pub const EXIT_OK: i32 = 0;
/// The task graph is invalid (dependency cycle)
pub const EXIT_INVALID: i32 = 1;
/// Usage, configuration or input error
pub const EXIT_CLI: i32 = 2;

/// Errors surfaced by the `scaffold` binary
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration could not be located or used
    #[error("Configuration error: {message}")]
    #[diagnostic(code(scaffold::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Configuration file is not valid TOML for the expected schema
    #[error("Failed to parse configuration file {path}")]
    #[diagnostic(
        code(scaffold::cli::config_parse),
        help("See the [log], [output] and [research] sections in the README")
    )]
    ConfigParse {
        path: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    /// A file could not be read
    #[error("Failed to read {}", path.display())]
    #[diagnostic(
        code(scaffold::cli::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The task file is not a task list
    #[error("Invalid task list in {source_name}")]
    #[diagnostic(
        code(scaffold::cli::input),
        help("Expected a JSON array of tasks, or an object with a \"tasks\" array")
    )]
    Input {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A result could not be encoded as JSON
    #[error("Failed to encode command output")]
    #[diagnostic(code(scaffold::cli::output))]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The task graph cannot be ordered
    #[error(transparent)]
    #[diagnostic(
        code(scaffold::cli::cycle),
        help("Run 'scaffold validate' to list every task on the cycle")
    )]
    Graph(#[from] scaffold_task_graph::Error),
}

impl CliError {
    /// Create a configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Wrap a TOML error, pointing at the offending span when known
    #[must_use]
    pub fn config_parse(path: impl Into<String>, src: String, err: &toml::de::Error) -> Self {
        let path = path.into();
        Self::ConfigParse {
            message: err.message().to_string(),
            span: err.span().map(SourceSpan::from),
            src: NamedSource::new(path.clone(), src),
            path,
        }
    }

    /// Create an I/O error for a path
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable error code used in JSON output
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::ConfigParse { .. } => "config",
            Self::Io { .. } => "io",
            Self::Input { .. } => "input",
            Self::Encode { .. } => "output",
            Self::Graph(_) => "cycle",
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Graph(_) => EXIT_INVALID,
        CliError::Config { .. }
        | CliError::ConfigParse { .. }
        | CliError::Io { .. }
        | CliError::Input { .. }
        | CliError::Encode { .. } => EXIT_CLI,
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<String>,
}

/// Render an error on stdout as JSON, or on stderr as a miette report
pub fn render_error(err: CliError, json_mode: bool) {
    if json_mode {
        let task = match &err {
            CliError::Graph(graph_err) => Some(graph_err.task().to_string()),
            _ => None,
        };
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: err.code(),
                message: err.to_string(),
                task,
            },
        };
        let mut stdout = io::stdout().lock();
        if let Ok(json) = serde_json::to_string(&envelope) {
            let _ = writeln!(stdout, "{json}");
        }
        let _ = stdout.flush();
    } else {
        let report = Report::new(err);
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{report:?}");
        let _ = stderr.flush();
    }
}
