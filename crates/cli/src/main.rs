//! netfirst entry point.
//!
//! Serves requests network-first with a bounded wait, falling back to the
//! SQLite response cache. Logging goes to stderr so response bodies can be
//! piped from stdout.

use anyhow::Result;
use clap::Parser;
use netfirst_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::debug!(cache = %config.cache_name, timeout_ms = config.network_timeout_ms, "loaded configuration");

    match cli.cmd {
        Command::Get(args) => commands::get(&config, args).await,
        Command::Precache => commands::precache(&config).await,
        Command::Caches => commands::caches(&config).await,
    }
}
