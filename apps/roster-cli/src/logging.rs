//! Tracing subscriber setup.
//!
//! Logs go to stderr so that command output on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CliError, CliResult};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter`.
pub fn init_logging(filter: &str, json: bool) -> CliResult<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| CliError::Config(format!("Invalid log filter '{filter}': {e}")))?;

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(filter = %filter, json, "Logging initialized");
    Ok(())
}

/// Initialize logging for tests (with simpler output).
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
