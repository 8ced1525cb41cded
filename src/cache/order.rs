//! Insertion Order Module
//!
//! Tracks the order in which ids were inserted into the cache.

use std::collections::BTreeMap;

// == Insertion Order ==
/// Sequence-numbered record of insertion order.
///
/// Every inserted key receives a strictly increasing sequence number:
/// - Smallest sequence = oldest insertion
/// - Largest sequence = newest insertion
///
/// The owner keeps each key's sequence number so removal is a point lookup.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Keys ordered by sequence number
    order: BTreeMap<u64, K>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Push ==
    /// Records `key` as the newest insertion and returns its sequence number.
    pub fn push(&mut self, key: K) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key);
        seq
    }

    // == Remove ==
    /// Forgets the key recorded under `seq`.
    pub fn remove(&mut self, seq: u64) -> Option<K> {
        self.order.remove(&seq)
    }

    // == Pop Newest ==
    /// Returns and removes the most recently inserted key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_newest(&mut self) -> Option<K> {
        self.order.pop_last().map(|(_, key)| key)
    }

    // == Iteration ==
    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.order.values()
    }

    // == Clear ==
    /// Forgets every key. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(order: &InsertionOrder<&'static str>) -> Vec<&'static str> {
        order.iter().copied().collect()
    }

    #[test]
    fn test_order_new() {
        let order: InsertionOrder<&str> = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut order = InsertionOrder::new();

        order.push("key1");
        order.push("key2");
        order.push("key3");

        assert_eq!(order.len(), 3);
        assert_eq!(keys(&order), vec!["key1", "key2", "key3"]);
        assert_eq!(order.iter().next_back(), Some(&"key3"));
    }

    #[test]
    fn test_remove_middle() {
        let mut order = InsertionOrder::new();

        order.push("a");
        let seq_b = order.push("b");
        order.push("c");

        assert_eq!(order.remove(seq_b), Some("b"));
        assert_eq!(keys(&order), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_unknown_sequence() {
        let mut order = InsertionOrder::new();
        order.push("a");

        assert_eq!(order.remove(99), None);
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_pop_newest() {
        let mut order = InsertionOrder::new();

        order.push("1");
        order.push("2");
        order.push("3");

        assert_eq!(order.pop_newest(), Some("3"));
        assert_eq!(keys(&order), vec!["1", "2"]);
        assert_eq!(order.pop_newest(), Some("2"));
        assert_eq!(order.pop_newest(), Some("1"));
        assert_eq!(order.pop_newest(), None);
    }

    #[test]
    fn test_reinsert_after_remove_goes_last() {
        let mut order = InsertionOrder::new();

        let seq_a = order.push("a");
        order.push("b");
        order.remove(seq_a);
        order.push("a");

        assert_eq!(keys(&order), vec!["b", "a"]);
    }

    #[test]
    fn test_clear_keeps_sequence_monotonic() {
        let mut order = InsertionOrder::new();

        let first = order.push("a");
        order.clear();
        let second = order.push("b");

        assert!(order.len() == 1);
        assert!(second > first);
    }
}
