//! Cache Module
//!
//! Provides the in-process entry cache: entries with freshness tracking,
//! an insertion-ordered container, and filtered views over its contents.

mod clock;
mod document;
mod entry;
mod order;
mod store;
mod summary;
mod value;
mod view;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use document::Document;
pub use entry::{CacheEntry, EntryState};
pub use order::InsertionOrder;
pub use store::Cache;
pub use summary::CacheSummary;
pub use value::{CacheValue, Complex, FrozenSet, MutableValue, Primitive, ValueKind, ValueType};
pub use view::EntryView;
