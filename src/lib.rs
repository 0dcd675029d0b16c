//! # freqtag - Concurrent Tagged Frequency Counters
//!
//! A Rust library for counting how often keys occur across many concurrent
//! producers, while remembering *which* producers reported each key.
//!
//! ## The Problem
//!
//! Finding duplicated lines across a set of files means counting every line
//! and also tracking the files it appeared in. Reading the files in parallel
//! turns the count table into shared mutable state: every reader thread
//! updates it, and the final report must see each key's count and file list
//! as one consistent pair.
//!
//! ## The Solution
//!
//! A tagged counter owns a map from key to `(count, tag set)`. `add(key, tag)`
//! increments the count and inserts the tag under a lock. Reads never hand
//! out the live tag set: they copy the count and the sorted tags while the
//! lock is still held, so a returned record can never be changed, or torn, by
//! a later write.
//!
//! ```text
//!   producer 0 ──add(line, "a.txt")──┐
//!   producer 1 ──add(line, "b.txt")──┼──► store ──get_all()──► observer
//!   producer N ──add(line, "c.txt")──┘   (lock)    (copies)
//! ```
//!
//! ### Design Principles
//!
//! 1. **Single ownership**: the store exclusively owns every entry; callers
//!    only ever receive owned copies.
//! 2. **Copy before release**: count and tags of a record are copied in the
//!    same critical section.
//! 3. **Ordered tag sets**: tags are kept in a `BTreeSet`, so a record's tags
//!    come out sorted with exactly one element per distinct tag.
//!
//! ## Available Stores
//!
//! | Type | Locking | Use Case |
//! |------|---------|----------|
//! | [`TaggedCounterStore`](store::locked::TaggedCounterStore) | One lock for the whole map | Default choice, exact snapshots |
//! | [`ShardedTaggedCounterStore`](store::sharded::ShardedTaggedCounterStore) | One lock per shard (64 shards) | Many writers on distinct keys |
//!
//! ## Quick Start
//!
//! ```rust
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//!
//! store.add("x", "f1");
//! store.add("y", "f1");
//! store.add("x", "f2");
//! store.add("x", "f1");
//!
//! let x = store.get("x");
//! assert_eq!(x.count, 3);
//! assert_eq!(x.tags, vec!["f1", "f2"]);
//!
//! assert_eq!(store.get("z").count, 0);
//! assert_eq!(store.get_all().len(), 2);
//! ```
//!
//! ## Counting Files
//!
//! The [`ingest`] module reads sources line by line into any store, in
//! parallel, skipping sources that cannot be read:
//!
//! ```rust,no_run
//! use freqtag::ingest::{count_sources, IngestConfig};
//! use freqtag::observers::text::TextObserver;
//! use freqtag::observers::Selection;
//! use freqtag::store::locked::TaggedCounterStore;
//! use std::path::PathBuf;
//!
//! let store = TaggedCounterStore::new();
//! let paths = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
//! let summary = count_sources(&paths, &store, &IngestConfig::new().workers(2));
//! eprintln!("{} sources read, {} failed", summary.sources_read, summary.failures.len());
//!
//! let duplicates = TextObserver::new().with_selection(Selection::new().min_count(2));
//! print!("{}", duplicates.render(&store));
//! ```
//!
//! ## Observers
//!
//! The [`observers`] module renders a store's records. Observers other than
//! plain text are gated behind feature flags:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | (none) | [`observers::text`] | `key count [tags]` lines |
//! | `table` | `observers::table` | Pretty-print records as ASCII tables |
//! | `json` | `observers::json` | Serialize records to JSON |
//! | `full` | All observers | Enables all observer modules |
//!
//! The `cli` feature additionally builds the `freqtag` binary.

pub mod ingest;
pub mod observers;
pub mod store;

#[cfg(feature = "serde")]
pub mod snapshot;
