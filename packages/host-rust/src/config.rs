//! Host configuration: fixture source and logging.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level host configuration.
///
/// Every field can come from a flag or from the matching environment
/// variable; flags win.
#[derive(Debug, Clone, Args)]
pub struct HostConfig {
    /// JSON fixture file backing the directory and mapping services.
    /// Without one, both services start empty.
    #[arg(long, env = "LOOKUP_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// Tracing filter directive (e.g. `debug`, `lookup_core=trace`).
    #[arg(long = "log", env = "LOOKUP_LOG", default_value = "warn")]
    pub log_filter: String,

    /// Log output format.
    #[arg(long, env = "LOOKUP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fixtures: None,
            log_filter: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
