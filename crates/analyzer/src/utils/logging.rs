use anyhow::{Context, Result};
use log::LevelFilter;

/// Initialises `env_logger` at `level`. HTTP and RPC client crates are held at
/// `warn` so per-request chatter does not drown the progress bar.
pub fn setup_logging(level: &str) -> Result<()> {
    let level: LevelFilter = level
        .parse()
        .with_context(|| format!("Invalid log level: {level}"))?;

    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("alloy", LevelFilter::Warn)
        .format_timestamp(None)
        .parse_default_env()
        .try_init()
        .context("Logger already initialised")?;

    Ok(())
}
