//! Structured logging for battery runs
//!
//! `init` installs a `tracing-subscriber` registry writing to stderr; the
//! `log` records emitted across the crate reach it through the subscriber's
//! `tracing-log` bridge. Events carrying data use `message | {json}` so lab
//! tooling can pick the payload apart.

use anyhow::{anyhow, Result};
use log::{Level, LevelFilter};
use std::io::{self, IsTerminal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::{APP_SUBSYSTEM, LOG_ENV_VAR};

/// Filter directive for a `--log-level` value
pub fn directive(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

/// `LPA_CONFORMANCE_LOG` wins over the command line when set
pub fn filter_for(level: LevelFilter) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(directive(level)))
        .map_err(|e| anyhow!("Invalid log filter: {}", e))
}

/// Install the stderr subscriber as the global backend
pub fn init(level: LevelFilter) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(filter_for(level)?)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to set logger: {}", e))
}

/// Parse a `--log-level` value
pub fn parse_level(value: &str) -> Result<LevelFilter> {
    value
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("Invalid log level: {}", value))
}

/// Emit a structured event: `message | {json}`
pub fn event(level: Level, message: &str, data: &serde_json::Value) {
    log::log!(target: APP_SUBSYSTEM, level, "{} | {}", message, data);
}
