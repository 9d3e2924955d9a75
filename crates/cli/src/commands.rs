//! Subcommand implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::args::GetArgs;
use netfirst_client::fetch::{canonicalize, resolve};
use netfirst_client::{FetchClient, FetchConfig, OfflineStrategy};
use netfirst_core::{AppConfig, CacheDb, Request, StrategyConfig};

/// Turn a command-line or configured target into an absolute URL.
fn resolve_target(config: &AppConfig, input: &str) -> Result<String> {
    let url = match &config.base_url {
        Some(base) => {
            let base = canonicalize(base).context("invalid base_url")?;
            resolve(&base, input)?
        }
        None => canonicalize(input)?,
    };
    Ok(url.to_string())
}

async fn build_strategy(config: &AppConfig, strategy_config: &StrategyConfig) -> Result<OfflineStrategy> {
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;
    let network = FetchClient::new(FetchConfig::from(config))?;
    Ok(OfflineStrategy::new(strategy_config, Arc::new(network), Arc::new(db)))
}

pub async fn get(config: &AppConfig, args: GetArgs) -> Result<()> {
    let url = resolve_target(config, &args.url)?;
    let mut strategy_config = config.strategy();
    if let Some(ms) = args.timeout_ms {
        strategy_config.network_timeout = Duration::from_millis(ms);
    }
    let strategy = build_strategy(config, &strategy_config).await?;

    let mut request = Request::new(args.method, url);
    for (name, value) in args.headers {
        request = request.with_header(name, value);
    }

    let response = strategy.get(request).await?;
    tracing::info!(status = response.status, origin = ?response.origin, bytes = response.body.len(), url = %response.url, "served");

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&response.body).await?;
    stdout.flush().await?;

    strategy.flush().await;
    Ok(())
}

pub async fn precache(config: &AppConfig) -> Result<()> {
    let mut strategy_config = config.strategy();
    strategy_config.resources = config
        .resources
        .iter()
        .map(|r| resolve_target(config, r))
        .collect::<Result<Vec<_>>>()?;

    let strategy = build_strategy(config, &strategy_config).await?;
    let report = strategy.precache().await;

    if report.failed > 0 {
        anyhow::bail!("{} of {} resources could not be cached", report.failed, report.failed + report.stored);
    }
    Ok(())
}

pub async fn caches(config: &AppConfig) -> Result<()> {
    let db = CacheDb::open(&config.db_path).await?;
    let mut stdout = tokio::io::stdout();
    for name in db.cache_names().await? {
        let count = db.open_cache(&name).await?.entry_count().await?;
        stdout.write_all(format!("{name}\t{count}\n").as_bytes()).await?;
    }
    stdout.flush().await?;
    Ok(())
}
