//! Log subscriber setup.

use std::env;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `WASP_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter directive: `RUST_LOG`, then `WASP_LOG_LEVEL`, then the default.
pub fn filter_directive(rust_log: Option<String>, wasp_log_level: Option<String>) -> String {
    rust_log
        .or(wasp_log_level)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// per-node results.
pub fn init(json_logs: bool) -> Result<()> {
    let directive = filter_directive(env::var("RUST_LOG").ok(), env::var("WASP_LOG_LEVEL").ok());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow!("invalid log filter {:?}: {}", directive, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
