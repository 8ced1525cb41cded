//! Staleness Monitor Task
//!
//! Background task that periodically reports how many cache entries are
//! stale. It never removes entries.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Cache, CacheSummary};

/// Summarizes the cache as of its clock's "now" and logs the result.
///
/// Logs at info level when stale entries exist, debug otherwise.
pub fn report_staleness<K>(cache: &Cache<K>) -> CacheSummary
where
    K: Eq + Hash + Clone + fmt::Display,
{
    let summary = cache.summary(cache.now());

    if summary.stale > 0 {
        info!(
            stale = summary.stale,
            total = summary.total_entries,
            "Staleness report: {} of {} entries are stale",
            summary.stale,
            summary.total_entries
        );
    } else {
        debug!(total = summary.total_entries, "Staleness report: no stale entries");
    }

    summary
}

/// Spawns a background task that periodically reports stale cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports. It only takes the read lock, so it never blocks other
/// readers.
///
/// # Arguments
/// * `cache` - Arc<RwLock<Cache>> shared reference to the cache
/// * `interval_secs` - Interval in seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(Cache::<u64>::new()));
/// let monitor_handle = spawn_staleness_monitor(cache.clone(), 30);
/// // Later, during shutdown:
/// monitor_handle.abort();
/// ```
pub fn spawn_staleness_monitor<K>(cache: Arc<RwLock<Cache<K>>>, interval_secs: u64) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting staleness monitor with interval of {} seconds",
            interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let cache_guard = cache.read().await;
            report_staleness(&cache_guard);
        }
    })
}
