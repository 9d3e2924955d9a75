//! Writes network responses into the named cache.
//!
//! Nothing here reports failure to the caller of a request: a response that
//! reached the user is never turned into an error by a broken cache.
//!
//! Background writes are tracked so a short-lived host can [`CacheWriter::flush`]
//! them before exiting.

use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;

use super::race::InFlight;
use netfirst_core::{CacheStorage, Request, Response};

/// Stores responses into one named cache.
#[derive(Clone)]
pub struct CacheWriter {
    storage: Arc<dyn CacheStorage>,
    cache_name: Arc<str>,
    background: Arc<Mutex<JoinSet<()>>>,
}

impl CacheWriter {
    pub fn new(storage: Arc<dyn CacheStorage>, cache_name: &str) -> Self {
        Self { storage, cache_name: Arc::from(cache_name), background: Arc::default() }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Open the cache and store `response` under `request`.
    ///
    /// Returns whether the entry was written; failures are only logged.
    pub async fn store(&self, request: &Request, response: &Response) -> bool {
        let cache = match self.storage.open(&self.cache_name).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(cache = %self.cache_name, error = %e, "failed to open cache");
                return false;
            }
        };

        match cache.put(request, response).await {
            Ok(()) => {
                tracing::debug!(cache = %self.cache_name, url = %request.url, status = response.status, "stored response");
                true
            }
            Err(e) => {
                tracing::warn!(cache = %self.cache_name, url = %request.url, error = %e, "failed to store response");
                false
            }
        }
    }

    /// Store `response` in a background task.
    pub fn spawn_store(&self, request: Arc<Request>, response: Response) {
        let writer = self.clone();
        self.spawn(async move {
            writer.store(&request, &response).await;
        });
    }

    /// Wait for a fetch that lost the race and store its response if it succeeds.
    pub fn spawn_freshen(&self, request: Arc<Request>, in_flight: InFlight) {
        let writer = self.clone();
        self.spawn(async move {
            match in_flight.settle().await {
                Ok(response) => {
                    writer.store(&request, &response).await;
                }
                Err(e) => tracing::debug!(url = %request.url, error = %e, "late network fetch failed"),
            }
        });
    }

    /// Wait until every background write spawned so far has finished.
    ///
    /// Dropping the returned future leaves the remaining writes running.
    pub async fn flush(&self) {
        let mut pending = Pending(match self.background.lock() {
            Ok(mut set) => std::mem::take(&mut *set),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        });
        while pending.0.join_next().await.is_some() {}
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut set = match self.background.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        while set.try_join_next().is_some() {}
        set.spawn(task);
    }
}

/// Writes taken out of the writer by [`CacheWriter::flush`].
///
/// A `JoinSet` aborts its tasks on drop, so anything still pending when the
/// flush is cancelled is detached instead.
struct Pending(JoinSet<()>);

impl Drop for Pending {
    fn drop(&mut self) {
        self.0.detach_all();
    }
}
