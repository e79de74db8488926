use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUICKPLAY_LOG";
const DEFAULT_FILTER: &str = "quickplay=warn";
const VERBOSE_FILTER: &str = "quickplay=debug";

/// Logs go to stderr so stdout stays usable as a playlist for other tools.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}
