//! Entry Cache - an in-process entry cache with freshness tracking
//!
//! Stores immutable primitives and mutable objects under caller-supplied ids,
//! reports which entries are stale, and exposes the cache over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheEntry, CacheValue, MutableValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_staleness_monitor;
