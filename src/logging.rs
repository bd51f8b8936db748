//! Structured logging bootstrap using `tracing`.
//!
//! Diagnostics go to stderr so stdout stays reserved for the run report.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::AppError;

/// Install a global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` when
/// `verbose` is requested.
pub fn init_tracing(verbose: bool) -> Result<(), AppError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| AppError::new(2, format!("Invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::new(2, format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(default_level, "tracing initialised");
    Ok(())
}
