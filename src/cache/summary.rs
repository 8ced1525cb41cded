//! Cache Summary Module
//!
//! Point-in-time counts of cached entries by freshness, mutability and type.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{CacheEntry, ValueKind};

// == Cache Summary ==
/// Counts describing the cache contents at a given instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheSummary {
    /// Time the summary was computed for (Unix milliseconds)
    pub now: i64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Entries older than their max age
    pub stale: usize,
    /// Entries within their max age, or without one
    pub fresh: usize,
    /// Entries holding mutable objects
    pub mutable: usize,
    /// Entries holding immutable primitives
    pub immutable: usize,
    /// Entry count per value type name
    pub by_type: BTreeMap<String, usize>,
}

impl CacheSummary {
    // == Constructor ==
    /// Tallies `entries` as of `now`.
    pub fn collect<'a, K, I>(entries: I, now: i64) -> Self
    where
        K: 'a,
        I: IntoIterator<Item = &'a CacheEntry<K>>,
    {
        let mut summary = Self {
            now,
            ..Self::default()
        };

        for entry in entries {
            summary.total_entries += 1;

            if entry.is_stale(now) {
                summary.stale += 1;
            } else {
                summary.fresh += 1;
            }

            match entry.kind() {
                ValueKind::Mutable => summary.mutable += 1,
                ValueKind::Immutable => summary.immutable += 1,
            }

            *summary
                .by_type
                .entry(entry.value_type().name().to_string())
                .or_insert(0) += 1;
        }

        summary
    }

    // == Stale Ratio ==
    /// Calculates the share of stale entries.
    ///
    /// Returns stale / total_entries, or 0.0 if the cache is empty.
    pub fn stale_ratio(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            self.stale as f64 / self.total_entries as f64
        }
    }
}
