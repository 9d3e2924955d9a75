//! Storage seams consumed by the request strategy.
//!
//! The strategy only ever reads through [`CacheStorage::match_request`] and
//! writes through a [`CacheHandle`] obtained from [`CacheStorage::open`], so
//! any store with those semantics can back it.

use std::sync::Arc;

use crate::{Error, Request, Response};

/// A persistent response store made of named caches.
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    /// Find a stored response for `request` in any cache.
    ///
    /// `Ok(None)` is a miss; `Err` is a storage failure.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error>;

    /// Open (creating if needed) the cache called `name`.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheHandle>, Error>;
}

/// An opened, named cache.
#[async_trait::async_trait]
pub trait CacheHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Store `response` under `request`, replacing any previous entry.
    async fn put(&self, request: &Request, response: &Response) -> Result<(), Error>;
}
