//! Core module containing the tagged counter stores and their shared types.
//!
//! A tagged counter records, for every distinct key, how many times the key
//! was added and the set of distinct tags that came with it. Two
//! implementations are provided:
//!
//! - [`TaggedCounterStore`](locked::TaggedCounterStore): one lock around the
//!   whole map. Simple, and fast enough for most workloads.
//! - [`ShardedTaggedCounterStore`](sharded::ShardedTaggedCounterStore): keys
//!   spread over [`NUM_SHARDS`] cache-padded shards, each behind its own lock.
//!
//! Both implement [`TagCounter`], which is what the ingest layer and the
//! observers work with.
//!
//! # Read Consistency
//!
//! Readers never see the live tag sets. Every read copies the count and the
//! tags of an entry while the lock guarding that entry is held:
//!
//! ```text
//!   add("x", "f2") ──lock──► [ x: 2 {f1,f2} ] ──unlock──►
//!                                   │
//!   get("x")        ──lock──► copy ─┘ ──unlock──► TagCount { 2, [f1, f2] }
//! ```
//!
//! The copy is owned by the caller, so later writes cannot show up in it.

pub mod locked;
pub mod sharded;

use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display};

/// Number of shards used by [`ShardedTaggedCounterStore`](sharded::ShardedTaggedCounterStore).
///
/// Each shard is cache-line padded, so writers on different shards do not
/// invalidate each other's cache lines.
pub const NUM_SHARDS: usize = 64;

/// Per-key state owned by a store.
///
/// Tags are kept ordered so that copying them out yields a sorted sequence
/// with exactly one element per distinct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Entry {
    count: u64,
    tags: BTreeSet<String>,
}

impl Entry {
    /// Creates the entry for a key seen for the first time.
    pub(crate) fn new(tag: &str) -> Self {
        let mut tags = BTreeSet::new();
        tags.insert(tag.to_owned());
        Self { count: 1, tags }
    }

    /// Records one more occurrence of the key.
    #[inline]
    pub(crate) fn record(&mut self, tag: &str) {
        self.count += 1;
        if !self.tags.contains(tag) {
            self.tags.insert(tag.to_owned());
        }
    }

    /// Copies the tags into a new sorted vector.
    pub(crate) fn sorted_tags(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    pub(crate) fn to_count(&self) -> TagCount {
        TagCount {
            count: self.count,
            tags: self.sorted_tags(),
        }
    }

    pub(crate) fn to_record(&self, key: &str) -> TagRecord {
        TagRecord {
            key: key.to_owned(),
            count: self.count,
            tags: self.sorted_tags(),
        }
    }

    pub(crate) fn into_record(self, key: String) -> TagRecord {
        TagRecord {
            key,
            count: self.count,
            tags: self.tags.into_iter().collect(),
        }
    }
}

/// The state of a single key: its count and its distinct tags.
///
/// Returned by [`TagCounter::get`]. An unseen key yields the default value,
/// a zero count with no tags.
///
/// # Examples
///
/// ```rust
/// use freqtag::store::locked::TaggedCounterStore;
/// use freqtag::store::{TagCount, TagCounter};
///
/// let store = TaggedCounterStore::new();
/// store.add("x", "f1");
///
/// assert_eq!(store.get("x").count, 1);
/// assert_eq!(store.get("nope"), TagCount::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCount {
    /// Number of times the key was added.
    pub count: u64,
    /// Distinct tags, sorted ascending.
    pub tags: Vec<String>,
}

/// One key of a store together with its count and tags.
///
/// Returned by [`TagCounter::get_all`]. The count and the tags are copied in
/// the same critical section, so `tags.len() <= count` always holds.
///
/// The `Display` form is `key count [tag1 tag2 ...]`:
///
/// ```rust
/// use freqtag::store::TagRecord;
///
/// let record = TagRecord::new("hello", 3, vec!["a.txt".into(), "b.txt".into()]);
/// assert_eq!(record.to_string(), "hello 3 [a.txt b.txt]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRecord {
    /// The counted key.
    pub key: String,
    /// Number of times the key was added.
    pub count: u64,
    /// Distinct tags, sorted ascending.
    pub tags: Vec<String>,
}

impl TagRecord {
    /// Creates a record from its parts.
    pub fn new(key: impl Into<String>, count: u64, tags: Vec<String>) -> Self {
        Self {
            key: key.into(),
            count,
            tags,
        }
    }
}

impl Display for TagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.key, self.count, self.tags.join(" "))
    }
}

/// A concurrent counter of keys, tracking the distinct tags seen per key.
///
/// All methods take `&self` and are safe to call from any number of threads
/// at once; share a store with `Arc` or scoped threads.
///
/// # Implementors
///
/// - [`TaggedCounterStore`](locked::TaggedCounterStore)
/// - [`ShardedTaggedCounterStore`](sharded::ShardedTaggedCounterStore)
///
/// # Examples
///
/// ```rust
/// use freqtag::store::locked::TaggedCounterStore;
/// use freqtag::store::TagCounter;
///
/// let store = TaggedCounterStore::new();
/// store.add("x", "f1");
/// store.add("y", "f1");
/// store.add("x", "f2");
/// store.add("x", "f1");
///
/// let x = store.get("x");
/// assert_eq!(x.count, 3);
/// assert_eq!(x.tags, vec!["f1", "f2"]);
/// assert_eq!(store.get_all().len(), 2);
/// ```
pub trait TagCounter: Debug + Send + Sync {
    /// Counts one occurrence of `key`, reported by `tag`.
    ///
    /// Empty strings are valid keys and tags. Never fails.
    fn add(&self, key: &str, tag: &str);

    /// Returns the current count and sorted tags of `key`.
    ///
    /// Returns [`TagCount::default()`] if the key was never added.
    fn get(&self, key: &str) -> TagCount;

    /// Returns one record per key currently present.
    ///
    /// The order of the records is unspecified; sort by key if a stable
    /// order is needed (the observers do this by default).
    fn get_all(&self) -> Vec<TagRecord>;

    /// Returns the number of distinct keys.
    fn len(&self) -> usize;

    /// Returns `true` if no key has been added yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new() {
        let entry = Entry::new("f1");
        assert_eq!(entry.to_count(), TagCount { count: 1, tags: vec!["f1".to_string()] });
    }

    #[test]
    fn test_entry_record_duplicate_tag() {
        let mut entry = Entry::new("a");
        entry.record("a");
        assert_eq!(entry.count, 2);
        assert_eq!(entry.sorted_tags(), vec!["a"]);
    }

    #[test]
    fn test_sorted_tags_has_no_placeholders() {
        let mut entry = Entry::new("c");
        entry.record("a");
        entry.record("b");
        entry.record("a");

        let tags = entry.sorted_tags();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert!(tags.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_empty_tag_is_a_real_tag() {
        let mut entry = Entry::new("");
        entry.record("x");
        assert_eq!(entry.sorted_tags(), vec!["", "x"]);
    }

    #[test]
    fn test_to_record_and_into_record_agree() {
        let mut entry = Entry::new("f2");
        entry.record("f1");

        let borrowed = entry.to_record("k");
        let owned = entry.into_record("k".to_string());
        assert_eq!(borrowed, owned);
        assert_eq!(owned.tags, vec!["f1", "f2"]);
    }

    #[test]
    fn test_record_display() {
        let record = TagRecord::new("line", 2, vec!["f1".into(), "f2".into()]);
        assert_eq!(record.to_string(), "line 2 [f1 f2]");

        let record = TagRecord::new("", 1, vec![]);
        assert_eq!(record.to_string(), " 1 []");
    }

    #[test]
    fn test_tag_count_default() {
        let count = TagCount::default();
        assert_eq!(count.count, 0);
        assert!(count.tags.is_empty());
    }
}
