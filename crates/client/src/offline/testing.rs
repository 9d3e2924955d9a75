//! Recording fakes for the network and cache seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::fetch::Fetch;
use netfirst_core::{CacheHandle, CacheStorage, Error, Request, Response, ResponseOrigin};

pub fn network_response(body: &'static str) -> Response {
    Response::from_network("https://example.com/", 200, body)
}

pub fn cached_response(body: &'static str) -> Response {
    Response { origin: ResponseOrigin::Cache, ..Response::from_network("https://example.com/", 200, body) }
}

#[derive(Debug, Clone)]
enum Behavior {
    Respond(Response),
    RespondAfter(Duration, Response),
    Fail(String),
    FailAfter(Duration, String),
    Never,
}

/// Scripted network that answers every request the same way.
#[derive(Debug, Clone)]
pub struct FakeNetwork {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl FakeNetwork {
    fn with(behavior: Behavior) -> Self {
        Self { behavior, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn respond(response: Response) -> Self {
        Self::with(Behavior::Respond(response))
    }

    pub fn respond_after(delay: Duration, response: Response) -> Self {
        Self::with(Behavior::RespondAfter(delay, response))
    }

    pub fn fail(message: &str) -> Self {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn fail_after(delay: Duration, message: &str) -> Self {
        Self::with(Behavior::FailAfter(delay, message.to_string()))
    }

    pub fn never() -> Self {
        Self::with(Behavior::Never)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetch for FakeNetwork {
    async fn fetch(&self, _request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Respond(response) => Ok(response.clone()),
            Behavior::RespondAfter(delay, response) => {
                tokio::time::sleep(*delay).await;
                Ok(response.clone())
            }
            Behavior::Fail(message) => Err(Error::Network(message.clone())),
            Behavior::FailAfter(delay, message) => {
                tokio::time::sleep(*delay).await;
                Err(Error::Network(message.clone()))
            }
            Behavior::Never => std::future::pending::<Result<Response, Error>>().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPut {
    pub cache: String,
    pub request: Request,
    pub response: Response,
}

#[derive(Default)]
struct FakeCacheState {
    entries: Mutex<HashMap<String, Response>>,
    puts: Mutex<Vec<RecordedPut>>,
    match_calls: AtomicUsize,
    fail_matches: AtomicBool,
    fail_puts: AtomicBool,
    fail_opens: AtomicBool,
}

/// In-memory cache keyed by URL that records every write.
#[derive(Clone, Default)]
pub struct FakeCache {
    state: Arc<FakeCacheState>,
}

impl FakeCache {
    pub fn with_entry(self, url: &str, response: Response) -> Self {
        self.state.entries.lock().unwrap().insert(url.to_string(), response);
        self
    }

    pub fn failing_matches(self) -> Self {
        self.state.fail_matches.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_puts(self) -> Self {
        self.state.fail_puts.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_opens(self) -> Self {
        self.state.fail_opens.store(true, Ordering::SeqCst);
        self
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.state.puts.lock().unwrap().clone()
    }

    pub fn match_calls(&self) -> usize {
        self.state.match_calls.load(Ordering::SeqCst)
    }

    /// Let background tasks run until `count` puts are recorded, or give up.
    pub async fn wait_for_puts(&self, count: usize) {
        for _ in 0..1_000 {
            if self.puts().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait::async_trait]
impl CacheStorage for FakeCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.state.match_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_matches.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("simulated storage failure".into()));
        }
        let hit = self.state.entries.lock().unwrap().get(&request.url).cloned();
        Ok(hit)
    }

    async fn open(&self, name: &str) -> Result<Arc<dyn CacheHandle>, Error> {
        if self.state.fail_opens.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("simulated open failure".into()));
        }
        Ok(Arc::new(FakeHandle { name: name.to_string(), state: self.state.clone() }))
    }
}

struct FakeHandle {
    name: String,
    state: Arc<FakeCacheState>,
}

#[async_trait::async_trait]
impl CacheHandle for FakeHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        if self.state.fail_puts.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("simulated write failure".into()));
        }
        self.state.puts.lock().unwrap().push(RecordedPut {
            cache: self.name.clone(),
            request: request.clone(),
            response: response.clone(),
        });
        Ok(())
    }
}
