//! Tracing subscriber bootstrap for the host binary.

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::config::{HostConfig, LogFormat};

/// Install the global tracing subscriber described by `config`.
///
/// Logs go to stderr so that resolved values on stdout stay clean.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &HostConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter '{}'", config.log_filter))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
