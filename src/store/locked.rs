//! Tagged counter store guarded by a single lock.
//!
//! This module provides [`TaggedCounterStore`], the reference store: a
//! `HashMap` from key to entry behind one [`parking_lot::Mutex`]. Every
//! operation holds the lock for its whole duration, which makes each `add`
//! atomic and each read a consistent copy.

use std::collections::HashMap;
use std::fmt::{self, Debug};

use parking_lot::Mutex;

use crate::store::{Entry, TagCount, TagCounter, TagRecord};

/// A concurrent tagged counter protected by one mutex.
///
/// One lock for the whole map is a deliberate choice: `add` is a hash lookup
/// and a few small allocations, so the critical section is short, and a single
/// lock makes `get_all` a true point-in-time snapshot across all keys. Use
/// [`ShardedTaggedCounterStore`](crate::store::sharded::ShardedTaggedCounterStore)
/// when many writers contend on distinct keys.
///
/// # Examples
///
/// ```rust
/// use freqtag::store::locked::TaggedCounterStore;
/// use freqtag::store::TagCounter;
/// use std::sync::Arc;
/// use std::thread;
///
/// let store = Arc::new(TaggedCounterStore::new());
/// let mut handles = vec![];
///
/// for i in 0..4 {
///     let s = Arc::clone(&store);
///     handles.push(thread::spawn(move || {
///         for _ in 0..1000 {
///             s.add("shared", &format!("thread-{i}"));
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// let shared = store.get("shared");
/// assert_eq!(shared.count, 4000);
/// assert_eq!(shared.tags.len(), 4);
/// ```
#[derive(Default)]
pub struct TaggedCounterStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl TaggedCounterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Returns `true` if `key` has been added at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Consumes the store and returns its records without copying the tags.
    ///
    /// No lock is taken: owning the store means no other thread can reach it.
    pub fn into_records(self) -> Vec<TagRecord> {
        self.entries
            .into_inner()
            .into_iter()
            .map(|(key, entry)| entry.into_record(key))
            .collect()
    }
}

impl TagCounter for TaggedCounterStore {
    #[inline]
    fn add(&self, key: &str, tag: &str) {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(entry) => entry.record(tag),
            None => {
                entries.insert(key.to_owned(), Entry::new(tag));
            }
        }
    }

    fn get(&self, key: &str) -> TagCount {
        self.entries
            .lock()
            .get(key)
            .map(Entry::to_count)
            .unwrap_or_default()
    }

    fn get_all(&self) -> Vec<TagRecord> {
        let entries = self.entries.lock();
        let mut records = Vec::with_capacity(entries.len());
        records.extend(entries.iter().map(|(key, entry)| entry.to_record(key)));
        records
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Debug for TaggedCounterStore {
    /// Formats the store showing only the number of keys.
    ///
    /// Output format: `TaggedCounterStore { keys: N }`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedCounterStore")
            .field("keys", &self.len())
            .finish()
    }
}
