//! In-memory request and response model shared by the cache and the network layer.
//!
//! Response bodies are buffered eagerly into [`Bytes`], so cloning a [`Response`]
//! yields an independently consumable copy without touching the payload.

use bytes::Bytes;

/// An intercepted request.
///
/// Handed to the strategy by value and never mutated afterwards; it doubles as
/// the cache key source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method, e.g. "GET" or "POST".
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Additional transport metadata.
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into(), url: url.into(), headers: Vec::new() }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Methods are matched case-insensitively.
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Where a [`Response`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrigin {
    Network,
    Cache,
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL the response was served from.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers in transport order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Bytes,
    /// Network-origin or cache-origin.
    pub origin: ResponseOrigin,
}

impl Response {
    /// Build a network-origin response.
    pub fn from_network(url: impl Into<String>, status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: Vec::new(),
            body: body.into(),
            origin: ResponseOrigin::Network,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
