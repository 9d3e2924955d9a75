//! Client code for netfirst.
//!
//! This crate provides the HTTP transport and the network-first request
//! strategy that falls back to the response cache.

pub mod fetch;
pub mod offline;

pub use fetch::{Fetch, FetchClient, FetchConfig};
pub use offline::{ExclusionPolicy, OfflineStrategy, PrecacheReport};
