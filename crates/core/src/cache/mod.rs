//! SQLite-backed response cache.
//!
//! This module provides a persistent store of named caches using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Request keys hashed with SHA-256
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - The [`CacheStorage`] / [`CacheHandle`] seams the request strategy uses

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod storage;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::NamedCache;
pub use storage::{CacheHandle, CacheStorage};
