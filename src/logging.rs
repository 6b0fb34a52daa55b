//! Logging setup for the command-line tool.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) -> Result<()> {
  let default_directive = if verbose { "info,caddy_push=debug" } else { "info" };
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init()
    .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;

  Ok(())
}
