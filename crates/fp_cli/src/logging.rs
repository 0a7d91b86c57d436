//! Logging setup
//!
//! Logs go to stderr; stdout is reserved for JSON output.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` when set, `default_level` otherwise.
pub fn initialize_logging(default_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(false);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}
