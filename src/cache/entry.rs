//! Cache Entry Module
//!
//! Defines individual cache entries: the cached value plus its identity,
//! timestamps and freshness budget.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::cache::{CacheValue, Clock, Primitive, ValueKind, ValueType};
use crate::error::{CacheError, Result};

// == Entry State ==
/// Result of [`CacheEntry::serialize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntryState {
    /// An immutable value, returned as is
    Value(Primitive),
    /// The minimal state of a mutable object
    Object(JsonValue),
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug)]
pub struct CacheEntry<K> {
    /// Caller-supplied unique identifier
    id: K,
    /// The stored value
    value: CacheValue,
    /// Mutability of `value`, fixed at construction
    kind: ValueKind,
    /// When the value was last obtained from its origin (Unix milliseconds)
    fetched_time: i64,
    /// Allowed staleness window in milliseconds, None or 0 = never stale
    max_age: Option<i64>,
    /// When the entry was created (Unix milliseconds)
    created_time: i64,
}

impl<K> CacheEntry<K> {
    // == Constructor ==
    /// Creates a new entry, reading the creation time from `clock`.
    ///
    /// # Errors
    /// `InvalidTimestamp` if `fetched_time` or `max_age` is negative.
    pub fn new(
        id: K,
        value: CacheValue,
        fetched_time: i64,
        max_age: Option<i64>,
        clock: &dyn Clock,
    ) -> Result<Self> {
        validate_timestamp(fetched_time)?;
        if let Some(age) = max_age {
            validate_timestamp(age)?;
        }

        Ok(Self {
            id,
            kind: value.kind(),
            value,
            fetched_time,
            max_age,
            created_time: clock.now_ms(),
        })
    }

    // == Accessors ==
    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn value(&self) -> &CacheValue {
        &self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn is_mutable(&self) -> bool {
        self.kind == ValueKind::Mutable
    }

    pub fn fetched_time(&self) -> i64 {
        self.fetched_time
    }

    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn created_time(&self) -> i64 {
        self.created_time
    }

    // == Update ==
    /// Replaces or mutates the value and records the new fetch time.
    ///
    /// Immutable entries are replaced wholesale and only accept immutable
    /// values. Mutable entries hand the state of `new_value` to their own
    /// object's `update`. On error the entry is left as it was.
    pub fn update(&mut self, new_value: CacheValue, fetched_time: i64) -> Result<()> {
        validate_timestamp(fetched_time)?;

        match (&mut self.value, new_value) {
            (CacheValue::Immutable(current), CacheValue::Immutable(replacement)) => {
                *current = replacement;
            }
            (CacheValue::Immutable(current), CacheValue::Mutable(object)) => {
                return Err(CacheError::UnsupportedValueType(format!(
                    "cannot replace immutable {} with mutable {}",
                    current.value_type(),
                    object.type_name()
                )));
            }
            (CacheValue::Mutable(object), replacement) => {
                object.update(&replacement.to_state(), fetched_time)?;
            }
        }

        self.fetched_time = fetched_time;
        Ok(())
    }

    // == Serialize ==
    /// Returns the immutable value itself, or the mutable object's minimal state.
    pub fn serialize(&self) -> EntryState {
        match &self.value {
            CacheValue::Immutable(primitive) => EntryState::Value(primitive.clone()),
            CacheValue::Mutable(object) => EntryState::Object(object.serialize()),
        }
    }

    // == Freshness ==
    /// Milliseconds since the value was fetched, saturating at the i64 range.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.fetched_time)
    }

    /// Effective expiry budget, treating 0 as unset.
    fn expiry(&self) -> Option<i64> {
        self.max_age.filter(|age| *age > 0)
    }

    /// Time after which the entry turns stale, or None if it never does.
    ///
    /// An expiry past `i64::MAX` is unrepresentable and reads as never.
    pub fn expires_at(&self) -> Option<i64> {
        self.expiry()
            .and_then(|age| self.fetched_time.checked_add(age))
    }

    /// Checks if the entry is stale at `now`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is still fresh.
    /// It turns stale once the age exceeds the budget.
    pub fn is_stale(&self, now: i64) -> bool {
        match self.expiry() {
            Some(max_age) => self.age(now) > max_age,
            None => false,
        }
    }

    /// Complement of [`is_stale`](Self::is_stale).
    pub fn is_fresh(&self, now: i64) -> bool {
        !self.is_stale(now)
    }
}

fn validate_timestamp(ms: i64) -> Result<()> {
    if ms < 0 {
        Err(CacheError::InvalidTimestamp(ms))
    } else {
        Ok(())
    }
}
