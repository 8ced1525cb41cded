//! Request DTOs for the entry cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::cache::{CacheValue, Document, Primitive, ValueType};
use crate::error::{CacheError, Result};

// == Wire Values ==
/// A cached value as sent by clients.
///
/// Primitives use their tagged form (`{"type": "int", "value": 5}`);
/// `{"type": "document", "value": {...}}` stores a mutable [`Document`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValueDto {
    Primitive(Primitive),
    Document(DocumentDto),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DocumentDto {
    Document(Map<String, JsonValue>),
}

impl ValueDto {
    pub fn into_cache_value(self) -> Result<CacheValue> {
        match self {
            ValueDto::Primitive(primitive) => Ok(CacheValue::Immutable(primitive)),
            ValueDto::Document(DocumentDto::Document(fields)) => Ok(CacheValue::mutable(
                Document::from_state(JsonValue::Object(fields))?,
            )),
        }
    }
}

/// Request body for the ADD operation (POST /entries)
#[derive(Debug, Clone, Deserialize)]
pub struct AddEntryRequest {
    /// Caller-generated unique id
    pub id: u64,
    /// The value to store
    pub value: ValueDto,
    /// When the value was fetched (Unix milliseconds)
    pub fetched_time: i64,
    /// Optional max age in milliseconds (uses the configured default if not specified)
    #[serde(default)]
    pub max_age: Option<i64>,
}

/// Request body for the UPDATE operation (PUT /entries/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEntryRequest {
    pub value: ValueDto,
    pub fetched_time: i64,
}

/// Request body for the SETDEFAULT operation (PUT /entries/:id/default)
#[derive(Debug, Clone, Deserialize)]
pub struct SetDefaultRequest {
    pub value: ValueDto,
}

// == Listing ==
/// Which entries a listing selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    Stale,
    Fresh,
    Mutable,
    Immutable,
}

impl FromStr for EntryFilter {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(EntryFilter::All),
            "stale" => Ok(EntryFilter::Stale),
            "fresh" => Ok(EntryFilter::Fresh),
            "mutable" => Ok(EntryFilter::Mutable),
            "immutable" => Ok(EntryFilter::Immutable),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown filter '{}'",
                other
            ))),
        }
    }
}

/// Query string for GET /entries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// One of `all`, `stale`, `fresh`, `mutable`, `immutable`
    #[serde(default)]
    pub filter: Option<String>,
    /// Exact value type name, e.g. `int` or `document`
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    /// Time to evaluate freshness at (defaults to the server clock)
    #[serde(default)]
    pub now: Option<i64>,
}

impl ListQuery {
    /// Parsed `filter`, defaulting to all entries.
    pub fn entry_filter(&self) -> Result<EntryFilter> {
        self.filter
            .as_deref()
            .map(str::parse::<EntryFilter>)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Parsed `type`, if given.
    pub fn type_filter(&self) -> Result<Option<ValueType>> {
        self.value_type
            .as_deref()
            .map(str::parse::<ValueType>)
            .transpose()
    }
}
