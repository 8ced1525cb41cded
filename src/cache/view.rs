//! Entry View Module
//!
//! Ordered, borrowed submappings returned by the cache's query operations.

use crate::cache::CacheEntry;

// == Entry View ==
/// An ordered selection of cache entries.
///
/// A view borrows the cache it came from, so the cache cannot be mutated
/// while the view is alive. Entries are shared with the cache, not cloned.
#[derive(Debug)]
pub struct EntryView<'a, K> {
    entries: Vec<(&'a K, &'a CacheEntry<K>)>,
}

impl<'a, K> EntryView<'a, K> {
    pub(crate) fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a CacheEntry<K>)>,
    {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by id. Linear in the size of the view.
    pub fn get(&self, id: &K) -> Option<&'a CacheEntry<K>>
    where
        K: PartialEq,
    {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, entry)| *entry)
    }

    pub fn contains_key(&self, id: &K) -> bool
    where
        K: PartialEq,
    {
        self.get(id).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a K> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn values(&self) -> impl Iterator<Item = &'a CacheEntry<K>> + '_ {
        self.entries.iter().map(|(_, entry)| *entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a K, &'a CacheEntry<K>)> + '_ {
        self.entries.iter().copied()
    }

    /// Owned copies of the ids, in order.
    pub fn ids(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }
}

impl<'a, K> IntoIterator for EntryView<'a, K> {
    type Item = (&'a K, &'a CacheEntry<K>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
