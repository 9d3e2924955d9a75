//! Cache lookups used when the network is slow or down.

use std::sync::Arc;

use netfirst_core::{CacheStorage, Request, Response};

/// Reads stored responses across every named cache.
#[derive(Clone)]
pub struct CacheFallback {
    storage: Arc<dyn CacheStorage>,
}

impl CacheFallback {
    pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
        Self { storage }
    }

    /// Find a stored response for `request`.
    ///
    /// Storage failures are logged and reported as a miss.
    pub async fn lookup(&self, request: &Request) -> Option<Response> {
        match self.storage.match_request(request).await {
            Ok(Some(response)) => {
                tracing::debug!(url = %request.url, "cache hit");
                Some(response)
            }
            Ok(None) => {
                tracing::debug!(url = %request.url, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::testing::{FakeCache, cached_response};

    #[tokio::test]
    async fn test_lookup_hit() {
        let cache = FakeCache::default().with_entry("https://example.com/", cached_response("stored"));
        let fallback = CacheFallback::new(Arc::new(cache));

        let hit = fallback.lookup(&Request::get("https://example.com/")).await;
        assert_eq!(hit, Some(cached_response("stored")));
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let fallback = CacheFallback::new(Arc::new(FakeCache::default()));
        assert!(fallback.lookup(&Request::get("https://example.com/")).await.is_none());
    }

    #[tokio::test]
    async fn test_storage_error_is_a_miss() {
        let cache = FakeCache::default()
            .with_entry("https://example.com/", cached_response("stored"))
            .failing_matches();
        let fallback = CacheFallback::new(Arc::new(cache.clone()));

        assert!(fallback.lookup(&Request::get("https://example.com/")).await.is_none());
        assert_eq!(cache.match_calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_against_sqlite() {
        let db = netfirst_core::CacheDb::open_in_memory().await.unwrap();
        let request = Request::get("https://example.com/page");
        db.open_cache("testCache")
            .await
            .unwrap()
            .put(&request, &crate::offline::testing::network_response("from disk"))
            .await
            .unwrap();

        let fallback = CacheFallback::new(Arc::new(db));
        let hit = fallback.lookup(&request).await.unwrap();
        assert_eq!(&hit.body[..], b"from disk");
        assert_eq!(hit.origin, netfirst_core::ResponseOrigin::Cache);
    }
}
