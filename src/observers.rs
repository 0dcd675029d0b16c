//! Observer implementations for reporting the contents of a tagged counter.
//!
//! Observers take a [`TagCounter`], read it once with
//! [`get_all`](TagCounter::get_all), and render the records:
//!
//! - [`text`] - One `key count [tags]` line per record
//! - [`table`] - Pretty-print records as tables using the `tabled` crate
//! - [`json`] - Serialize records to JSON
//!
//! # Ordering and Filtering
//!
//! A store returns its records in no particular order. Every observer applies
//! a [`Selection`] first, which by default sorts records by key so that the
//! same input always produces the same report. A selection can also drop
//! rare keys: `min_count(2)` keeps only keys seen more than once.
//!
//! # Unified Error Handling
//!
//! All observers use a unified [`ObserverError`] type.
//!
//! # Feature Flags
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust
//! use freqtag::observers::text::TextObserver;
//! use freqtag::observers::{RecordOrder, Selection};
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//! store.add("b", "f1");
//! store.add("a", "f2");
//! store.add("a", "f1");
//!
//! let output = TextObserver::new().render(&store);
//! assert_eq!(output, "a 2 [f1 f2]\nb 1 [f1]\n");
//!
//! let output = TextObserver::new()
//!     .with_selection(Selection::new().min_count(2))
//!     .render(&store);
//! assert_eq!(output, "a 2 [f1 f2]\n");
//! ```

mod error;

pub use error::{ObserverError, Result};

pub mod text;

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

use crate::store::{TagCounter, TagRecord};

/// Order in which observers emit records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    /// Ascending by key (default).
    #[default]
    Key,
    /// Descending by count, ties broken by ascending key.
    CountDesc,
    /// Whatever order the store returned.
    Unordered,
}

/// Which records an observer reports, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Order of the emitted records.
    pub order: RecordOrder,
    /// Records with a smaller count are left out.
    pub min_count: u64,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            order: RecordOrder::default(),
            min_count: 1,
        }
    }
}

impl Selection {
    /// Creates a selection that keeps every record, sorted by key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record order.
    pub fn order(mut self, order: RecordOrder) -> Self {
        self.order = order;
        self
    }

    /// Keeps only records whose count is at least `min_count`.
    pub fn min_count(mut self, min_count: u64) -> Self {
        self.min_count = min_count;
        self
    }

    /// Filters and orders `records`.
    pub fn apply(&self, mut records: Vec<TagRecord>) -> Vec<TagRecord> {
        records.retain(|r| r.count >= self.min_count);
        match self.order {
            RecordOrder::Key => records.sort_unstable_by(|a, b| a.key.cmp(&b.key)),
            RecordOrder::CountDesc => {
                records.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)))
            }
            RecordOrder::Unordered => {}
        }
        records
    }

    /// Reads `counter` once and returns the selected records.
    pub fn collect(&self, counter: &dyn TagCounter) -> Vec<TagRecord> {
        self.apply(counter.get_all())
    }
}
