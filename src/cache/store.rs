//! Cache Store Module
//!
//! Main cache engine: an insertion-ordered mapping from caller-supplied ids
//! to entries, with freshness, mutability and type views over its contents.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheSummary, CacheValue, Clock, EntryView, InsertionOrder, MutableValue,
    SystemClock, ValueKind, ValueType,
};
use crate::error::{CacheError, Result};

/// An entry together with its position in insertion order.
#[derive(Debug)]
struct Slot<K> {
    seq: u64,
    entry: CacheEntry<K>,
}

// == Cache ==
/// Insertion-ordered entry cache.
///
/// Staleness is reported, never acted upon: nothing is evicted implicitly.
/// Iteration methods (`keys`, `values`, `items`) are live borrowing views,
/// so the cache cannot change while one is in use.
pub struct Cache<K> {
    /// Id-to-entry storage
    entries: HashMap<K, Slot<K>>,
    /// Insertion order of ids
    order: InsertionOrder<K>,
    /// Source of "now" for creation times and default fetch times
    clock: Arc<dyn Clock>,
}

impl<K> Cache<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    // == Constructor ==
    /// Creates an empty cache reading time from the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            clock,
        }
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    // == Add ==
    /// Stores a new entry at the end of insertion order.
    ///
    /// # Errors
    /// - `DuplicateKey` if `id` is already stored; the existing entry is untouched
    /// - `InvalidTimestamp` if `fetched_time` or `max_age` is negative
    pub fn add(
        &mut self,
        id: K,
        value: impl Into<CacheValue>,
        fetched_time: i64,
        max_age: Option<i64>,
    ) -> Result<&CacheEntry<K>> {
        if self.entries.contains_key(&id) {
            return Err(CacheError::DuplicateKey(id.to_string()));
        }

        let entry = CacheEntry::new(
            id.clone(),
            value.into(),
            fetched_time,
            max_age,
            self.clock.as_ref(),
        )?;
        debug!(id = %id, kind = ?entry.kind(), "cache entry added");

        Ok(self.insert_entry(id, entry))
    }

    fn insert_entry(&mut self, id: K, entry: CacheEntry<K>) -> &CacheEntry<K> {
        let seq = self.order.push(id.clone());
        &self.entries.entry(id).or_insert(Slot { seq, entry }).entry
    }

    // == Get ==
    /// Returns the entry stored at `id`, if any.
    pub fn get(&self, id: &K) -> Option<&CacheEntry<K>> {
        self.entries.get(id).map(|slot| &slot.entry)
    }

    /// Mutable access for direct `CacheEntry::update` calls.
    pub fn get_mut(&mut self, id: &K) -> Option<&mut CacheEntry<K>> {
        self.entries.get_mut(id).map(|slot| &mut slot.entry)
    }

    /// Returns the value stored at `id`.
    pub fn get_value(&self, id: &K) -> Result<&CacheValue> {
        self.get(id)
            .map(CacheEntry::value)
            .ok_or_else(|| CacheError::NotFound(id.to_string()))
    }

    pub fn contains_key(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    // == Update ==
    /// Delegates to [`CacheEntry::update`] for the entry at `id`.
    pub fn update(&mut self, id: &K, value: impl Into<CacheValue>, fetched_time: i64) -> Result<()> {
        let entry = self
            .get_mut(id)
            .ok_or_else(|| CacheError::NotFound(id.to_string()))?;
        entry.update(value.into(), fetched_time)
    }

    // == Remove ==
    /// Removes and returns the entry at `id`, or None if absent.
    pub fn remove(&mut self, id: &K) -> Option<CacheEntry<K>> {
        let slot = self.entries.remove(id)?;
        self.order.remove(slot.seq);
        debug!(id = %id, "cache entry removed");
        Some(slot.entry)
    }

    // == Pop ==
    /// Removes and returns the entry at `id`.
    ///
    /// # Errors
    /// `NotFound` if `id` is absent.
    pub fn pop(&mut self, id: &K) -> Result<CacheEntry<K>> {
        self.remove(id)
            .ok_or_else(|| CacheError::NotFound(id.to_string()))
    }

    // == Pop Item ==
    /// Removes and returns the most recently inserted entry.
    ///
    /// # Errors
    /// `EmptyCache` if there are no entries.
    pub fn popitem(&mut self) -> Result<(K, CacheEntry<K>)> {
        let id = self.order.pop_newest().ok_or(CacheError::EmptyCache)?;
        let slot = self
            .entries
            .remove(&id)
            .ok_or_else(|| CacheError::NotFound(id.to_string()))?;
        debug!(id = %id, "cache entry popped");
        Ok((id, slot.entry))
    }

    // == Set Default ==
    /// Returns the entry at `id`, inserting `default_value` first if absent.
    ///
    /// A new entry is fetched "now" and has no max age. An existing entry is
    /// returned unchanged.
    pub fn setdefault(&mut self, id: K, default_value: impl Into<CacheValue>) -> Result<&CacheEntry<K>> {
        if self.entries.contains_key(&id) {
            return self
                .get(&id)
                .ok_or_else(|| CacheError::NotFound(id.to_string()));
        }

        let now = self.now();
        self.add(id, default_value, now, None)
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        debug!(removed, "cache cleared");
    }

    // == Copy ==
    /// Returns every entry, in insertion order.
    ///
    /// The result is a borrowed view, not an owned snapshot: entries are
    /// shared with the cache. The cache cannot be mutated while the view is
    /// alive, so later `add`/`remove` calls can never be observed through it.
    pub fn copy(&self) -> EntryView<'_, K> {
        EntryView::from_pairs(self.items())
    }

    // == Iteration ==
    /// Ids in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Entries in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &CacheEntry<K>> + '_ {
        self.items().map(|(_, entry)| entry)
    }

    /// (id, entry) pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&K, &CacheEntry<K>)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|slot| (id, &slot.entry)))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Find ==
    /// Entries for which `predicate` holds, in insertion order.
    pub fn find<P>(&self, mut predicate: P) -> EntryView<'_, K>
    where
        P: FnMut(&CacheEntry<K>) -> bool,
    {
        EntryView::from_pairs(self.items().filter(|&(_, entry)| predicate(entry)))
    }

    // == Freshness Views ==
    pub fn stale(&self, now: i64) -> EntryView<'_, K> {
        self.find(|entry| entry.is_stale(now))
    }

    pub fn fresh(&self, now: i64) -> EntryView<'_, K> {
        self.find(|entry| entry.is_fresh(now))
    }

    /// Stale entries according to the injected clock.
    pub fn stale_now(&self) -> EntryView<'_, K> {
        self.stale(self.now())
    }

    /// Fresh entries according to the injected clock.
    pub fn fresh_now(&self) -> EntryView<'_, K> {
        self.fresh(self.now())
    }

    // == Kind Views ==
    pub fn mutable(&self) -> EntryView<'_, K> {
        self.find(|entry| entry.kind() == ValueKind::Mutable)
    }

    pub fn immutable(&self) -> EntryView<'_, K> {
        self.find(|entry| entry.kind() == ValueKind::Immutable)
    }

    // == Type Views ==
    /// Entries whose value has exactly the type `value_type`.
    pub fn by_type(&self, value_type: ValueType) -> EntryView<'_, K> {
        self.find(|entry| entry.value_type() == value_type)
    }

    pub fn strings(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Str)
    }

    pub fn ints(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Int)
    }

    pub fn floats(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Float)
    }

    pub fn complexes(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Complex)
    }

    pub fn bools(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Bool)
    }

    pub fn tuples(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::Tuple)
    }

    pub fn frozensets(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::FrozenSet)
    }

    /// Entries holding a mutable object of exactly type `T`.
    pub fn objects_of<T: MutableValue>(&self) -> EntryView<'_, K> {
        self.by_type(ValueType::of::<T>())
    }

    // == Summary ==
    /// Counts entries by freshness at `now`, kind and type.
    pub fn summary(&self, now: i64) -> CacheSummary {
        CacheSummary::collect(self.values(), now)
    }
}

impl<K> Default for Cache<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for Cache<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("len", &self.entries.len())
            .field("order", &self.order)
            .finish()
    }
}
