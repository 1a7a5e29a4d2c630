//! Optional `scaffold.toml` configuration.
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "json"
//!
//! [output]
//! format = "json"
//!
//! [research]
//! max_concurrency = 8
//! ```
//!
//! Command-line flags take precedence over every value in the file.

use crate::cli::OutputFormat;
use crate::errors::CliError;
use crate::tracing::{LogLevel, TracingFormat};
use scaffold_research::ResearchConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "SCAFFOLD_CONFIG";
/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "scaffold.toml";

/// Contents of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    pub log: LogSection,
    pub output: OutputSection,
    pub research: ResearchConfig,
}

/// `[log]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<LogLevel>,
    pub format: Option<TracingFormat>,
    /// Raw `EnvFilter` directives, e.g. `"scaffold_task_graph=trace"`
    pub filter: Option<String>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

impl ScaffoldConfig {
    /// Load the configuration.
    ///
    /// An explicit path (from `--config` or `SCAFFOLD_CONFIG`) must exist.
    /// Without one, `./scaffold.toml` is used when present and defaults
    /// otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path: PathBuf = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::config_with_help(
                        format!("configuration file {} does not exist", path.display()),
                        format!("Pass an existing file to --config or unset {CONFIG_ENV}"),
                    ));
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let src = std::fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
        Self::parse(&path.display().to_string(), src)
    }

    /// Parse configuration text; `name` is used in diagnostics.
    pub fn parse(name: &str, src: String) -> Result<Self, CliError> {
        match toml::from_str::<Self>(&src) {
            Ok(config) => {
                ::tracing::debug!(config = name, "Loaded configuration");
                Ok(config)
            }
            Err(err) => Err(CliError::config_parse(name, src, &err)),
        }
    }
}
