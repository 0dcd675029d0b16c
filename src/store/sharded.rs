//! Tagged counter store split over independently locked shards.
//!
//! This module provides [`ShardedTaggedCounterStore`]. Keys are hashed to one
//! of [`NUM_SHARDS`] shards; each shard is a small map behind its own lock and
//! is cache-line padded to prevent false sharing between neighbouring locks.
//!
//! ```text
//!                       ┌──────────────────────────────────────┐
//!   add("a", ..) ──►    │ [Shard 0]  Mutex<HashMap> (padded)   │
//!   add("q", ..) ──►    │ [Shard 1]  Mutex<HashMap> (padded)   │
//!        ...            │    ...                               │
//!   add("z", ..) ──►    │ [Shard 63] Mutex<HashMap> (padded)   │
//!                       └──────────────────────────────────────┘
//!                                        │
//!                                        ▼
//!                             get_all() visits shards
//!                                   one at a time
//! ```

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::BuildHasher;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

use crate::store::{Entry, TagCount, TagCounter, TagRecord, NUM_SHARDS};

type Shard = CachePadded<Mutex<HashMap<String, Entry>>>;

/// A concurrent tagged counter with one lock per shard.
///
/// A key always lands on the same shard, so every per-key guarantee of
/// [`TaggedCounterStore`](crate::store::locked::TaggedCounterStore) holds:
/// no lost updates, and every record returned by a read was copied under the
/// lock of its shard.
///
/// # Atomicity Note
///
/// [`get_all`](TagCounter::get_all) locks the shards one after the other.
/// Each record is internally consistent, but adds running concurrently may
/// be visible in shards visited later and missing from shards visited
/// earlier. Once writers have settled, the result is exact.
///
/// # Memory Usage
///
/// An empty store already holds 64 padded shards, a few kilobytes, before
/// any key is added.
///
/// # Examples
///
/// ```rust
/// use freqtag::store::sharded::ShardedTaggedCounterStore;
/// use freqtag::store::TagCounter;
///
/// let store = ShardedTaggedCounterStore::new();
/// store.add("x", "f1");
/// store.add("x", "f2");
///
/// assert_eq!(store.get("x").tags, vec!["f1", "f2"]);
/// ```
pub struct ShardedTaggedCounterStore {
    shards: Box<[Shard]>,
    hasher: RandomState,
}

impl ShardedTaggedCounterStore {
    /// Creates an empty store with [`NUM_SHARDS`] shards.
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS)
            .map(|_| CachePadded::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Returns the shard responsible for `key`.
    #[inline]
    fn shard(&self, key: &str) -> &Mutex<HashMap<String, Entry>> {
        let idx = self.hasher.hash_one(key) as usize % self.shards.len();
        &self.shards[idx]
    }

    /// Returns `true` if `key` has been added at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.shard(key).lock().contains_key(key)
    }

    /// Returns the number of keys held by each shard.
    ///
    /// Useful to check how evenly keys spread over the shards.
    pub fn shard_lengths(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.lock().len()).collect()
    }

    /// Consumes the store and returns its records without copying the tags.
    pub fn into_records(self) -> Vec<TagRecord> {
        self.shards
            .into_vec()
            .into_iter()
            .flat_map(|shard| CachePadded::into_inner(shard).into_inner())
            .map(|(key, entry)| entry.into_record(key))
            .collect()
    }
}

impl TagCounter for ShardedTaggedCounterStore {
    #[inline]
    fn add(&self, key: &str, tag: &str) {
        let mut shard = self.shard(key).lock();
        match shard.get_mut(key) {
            Some(entry) => entry.record(tag),
            None => {
                shard.insert(key.to_owned(), Entry::new(tag));
            }
        }
    }

    fn get(&self, key: &str) -> TagCount {
        self.shard(key)
            .lock()
            .get(key)
            .map(Entry::to_count)
            .unwrap_or_default()
    }

    fn get_all(&self) -> Vec<TagRecord> {
        let mut records = Vec::new();
        for shard in self.shards.iter() {
            let shard = shard.lock();
            records.reserve(shard.len());
            records.extend(shard.iter().map(|(key, entry)| entry.to_record(key)));
        }
        records
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }
}

impl Default for ShardedTaggedCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ShardedTaggedCounterStore {
    /// Formats the store showing the shard count and the number of keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedTaggedCounterStore")
            .field("shards", &self.shards.len())
            .field("keys", &self.len())
            .finish()
    }
}
