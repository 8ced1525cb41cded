//! Response DTOs for the entry cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::cache::{CacheEntry, CacheSummary, CacheValue, EntryState, ValueKind};

/// Renders a value in the same tagged form clients send.
pub fn value_to_json(value: &CacheValue) -> JsonValue {
    match value {
        CacheValue::Immutable(primitive) => {
            serde_json::to_value(primitive).unwrap_or(JsonValue::Null)
        }
        CacheValue::Mutable(object) => json!({
            "type": object.type_name().to_ascii_lowercase(),
            "value": object.serialize(),
        }),
    }
}

/// Formats Unix milliseconds as RFC 3339, if representable.
fn rfc3339(ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|time| time.to_rfc3339())
}

/// Response body describing one entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: u64,
    pub value: JsonValue,
    pub kind: ValueKind,
    pub value_type: String,
    pub fetched_time: i64,
    pub max_age: Option<i64>,
    pub created_time: i64,
    /// `created_time` in RFC 3339 format
    pub created_at: Option<String>,
    pub expires_at: Option<i64>,
    /// Freshness as of the time the response was built
    pub stale: bool,
}

impl EntryResponse {
    /// Describes `entry` as of `now`
    pub fn new(entry: &CacheEntry<u64>, now: i64) -> Self {
        Self {
            id: *entry.id(),
            value: value_to_json(entry.value()),
            kind: entry.kind(),
            value_type: entry.value_type().name().to_string(),
            fetched_time: entry.fetched_time(),
            max_age: entry.max_age(),
            created_time: entry.created_time(),
            created_at: rfc3339(entry.created_time()),
            expires_at: entry.expires_at(),
            stale: entry.is_stale(now),
        }
    }
}

/// Response body for GET /entries
#[derive(Debug, Clone, Serialize)]
pub struct EntryListResponse {
    pub now: i64,
    pub count: usize,
    pub entries: Vec<EntryResponse>,
}

impl EntryListResponse {
    pub fn new(now: i64, entries: Vec<EntryResponse>) -> Self {
        Self {
            now,
            count: entries.len(),
            entries,
        }
    }
}

/// Response body for GET /entries/:id/state
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub id: u64,
    pub state: EntryState,
}

/// Response body for the DELETE operations
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl DeleteResponse {
    pub fn entry(id: u64) -> Self {
        Self {
            message: format!("Entry '{}' removed successfully", id),
            removed: 1,
        }
    }

    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub summary: CacheSummary,
    /// stale / total_entries
    pub stale_ratio: f64,
}

impl StatsResponse {
    pub fn new(summary: CacheSummary) -> Self {
        Self {
            stale_ratio: summary.stale_ratio(),
            summary,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
