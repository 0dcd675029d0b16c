//! Serializable snapshot of a tagged counter.
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! freqtag = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use freqtag::snapshot::StoreSnapshot;
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//! store.add("hello", "a.txt");
//!
//! let snapshot = StoreSnapshot::collect(&store);
//! let json = serde_json::to_string(&snapshot).unwrap();
//! ```

use crate::store::{TagCounter, TagRecord};
use serde::{Deserialize, Serialize};

/// All records of a store captured at one point, optionally timestamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp_ms: Option<u64>,
    /// The captured records.
    pub records: Vec<TagRecord>,
}

impl StoreSnapshot {
    /// Creates a snapshot from records.
    pub fn new(records: Vec<TagRecord>) -> Self {
        Self {
            timestamp_ms: None,
            records,
        }
    }

    /// Creates a snapshot from records and a timestamp.
    pub fn with_timestamp(records: Vec<TagRecord>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            records,
        }
    }

    /// Reads every record of `counter`, sorted by key.
    pub fn collect(counter: &dyn TagCounter) -> Self {
        let mut records = counter.get_all();
        records.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        Self::new(records)
    }

    /// Reads every record of `counter`, sorted by key, stamped with the
    /// current time.
    pub fn collect_with_timestamp(counter: &dyn TagCounter) -> Self {
        Self {
            timestamp_ms: Some(current_timestamp_ms()),
            ..Self::collect(counter)
        }
    }

    /// Finds the record of `key`.
    pub fn get(&self, key: &str) -> Option<&TagRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    /// Sum of the counts of all records.
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
pub(crate) fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
