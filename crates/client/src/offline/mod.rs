//! Network-first request strategy with a bounded wait and cache fallback.
//!
//! ### Decision
//! - Non-GET and excluded requests go straight to the network, untouched.
//! - Otherwise the network gets `network_timeout` to answer. A response in time
//!   is returned and stored.
//! - A network failure falls back to the cache, and to the original error on a miss.
//! - A timeout falls back to the cache. On a miss the call keeps waiting for
//!   the network. On a hit the cached response is returned and the fetch keeps
//!   running so that its response can refresh the cache.
//!
//! ### Side effects
//! - Cache writes run in detached tasks and never delay or fail a request.
//! - The network fetch is never aborted.

pub mod exclusion;
pub mod fallback;
pub mod race;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

pub use exclusion::ExclusionPolicy;
pub use fallback::CacheFallback;
pub use race::{InFlight, RaceOutcome, race};
pub use store::CacheWriter;

use crate::fetch::Fetch;
use netfirst_core::{CacheStorage, Error, Request, Response, StrategyConfig};

/// Counts from a [`OfflineStrategy::precache`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecacheReport {
    pub stored: usize,
    pub failed: usize,
}

/// Decides, per request, whether the network or the cache answers.
pub struct OfflineStrategy {
    network: Arc<dyn Fetch>,
    exclusion: ExclusionPolicy,
    fallback: CacheFallback,
    writer: CacheWriter,
    network_timeout: Duration,
    resources: Vec<String>,
}

impl OfflineStrategy {
    pub fn new(config: &StrategyConfig, network: Arc<dyn Fetch>, storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            network,
            exclusion: ExclusionPolicy::new(&config.excluded_paths),
            fallback: CacheFallback::new(storage.clone()),
            writer: CacheWriter::new(storage, &config.cache_name),
            network_timeout: config.network_timeout,
            resources: config.resources.clone(),
        }
    }

    /// True if `request` skips the cache entirely.
    pub fn bypasses_cache(&self, request: &Request) -> bool {
        !request.is_get() || self.exclusion.is_excluded(request)
    }

    /// Answer `request` from the network or the cache.
    ///
    /// # Errors
    ///
    /// Returns the network error when the network fails and the cache has no
    /// entry, or whatever the network returned for a bypassed request.
    pub async fn get(&self, request: Request) -> Result<Response, Error> {
        if self.bypasses_cache(&request) {
            tracing::debug!(method = %request.method, url = %request.url, "bypassing cache");
            return self.network.fetch(&request).await;
        }

        let request = Arc::new(request);
        let in_flight = InFlight::spawn(self.network.clone(), request.clone());

        match race(in_flight, self.network_timeout).await {
            RaceOutcome::NetworkWon(response) => {
                tracing::debug!(url = %request.url, status = response.status, "network answered in time");
                Ok(self.store_and_return(request, response))
            }
            RaceOutcome::NetworkLost(error) => {
                tracing::debug!(url = %request.url, %error, "network failed, trying cache");
                self.cached_or(&request, error).await
            }
            RaceOutcome::TimedOut(in_flight) => {
                tracing::debug!(
                    url = %request.url,
                    timeout_ms = self.network_timeout.as_millis() as u64,
                    "network timed out, trying cache"
                );
                if let Some(cached) = self.fallback.lookup(&request).await {
                    self.writer.spawn_freshen(request, in_flight);
                    return Ok(cached);
                }

                match in_flight.settle().await {
                    Ok(response) => Ok(self.store_and_return(request, response)),
                    Err(error) => {
                        tracing::debug!(url = %request.url, %error, "network failed after timeout, trying cache");
                        self.cached_or(&request, error).await
                    }
                }
            }
        }
    }

    /// Wait for background cache writes (including late network responses) to finish.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Fetch every configured resource and store it in the named cache.
    ///
    /// Only 2xx responses are stored. Failures are logged and counted; they
    /// never abort the run.
    pub async fn precache(&self) -> PrecacheReport {
        let mut report = PrecacheReport::default();

        for url in &self.resources {
            let request = Request::get(url.as_str());
            let stored = match self.network.fetch(&request).await {
                Ok(response) if response.is_success() => self.writer.store(&request, &response).await,
                Ok(response) => {
                    tracing::warn!(%url, status = response.status, "refusing to precache unsuccessful response");
                    false
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "failed to fetch resource for precache");
                    false
                }
            };

            if stored {
                report.stored += 1;
            } else {
                report.failed += 1;
            }
        }

        tracing::info!(
            cache = self.writer.cache_name(),
            stored = report.stored,
            failed = report.failed,
            "precache finished"
        );
        report
    }

    fn store_and_return(&self, request: Arc<Request>, response: Response) -> Response {
        self.writer.spawn_store(request, response.clone());
        response
    }

    async fn cached_or(&self, request: &Request, error: Error) -> Result<Response, Error> {
        match self.fallback.lookup(request).await {
            Some(cached) => Ok(cached),
            None => Err(error),
        }
    }
}
