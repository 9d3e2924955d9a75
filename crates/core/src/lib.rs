//! Core types and shared functionality for netfirst.
//!
//! This crate provides:
//! - Request/response model with eagerly buffered bodies
//! - Response cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheDb, CacheHandle, CacheStorage, NamedCache};
pub use config::{AppConfig, ConfigError, StrategyConfig};
pub use error::Error;
pub use http::{Request, Response, ResponseOrigin};
