//! JSON observer for serializing tagged counts.
//!
//! This module provides [`JsonObserver`], which serializes the records of a
//! [`TagCounter`] to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! freqtag = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use freqtag::observers::json::JsonObserver;
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//! store.add("hello", "a.txt");
//! store.add("hello", "b.txt");
//!
//! let json = JsonObserver::new().to_json(&store).unwrap();
//! assert_eq!(json, r#"[{"key":"hello","count":2,"tags":["a.txt","b.txt"]}]"#);
//! ```

use std::io::Write;

use crate::observers::{Result, Selection};
use crate::snapshot::{current_timestamp_ms, StoreSnapshot};
use crate::store::TagCounter;

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap records in a [`StoreSnapshot`] object.
    pub wrap_in_snapshot: bool,
    /// Which records to serialize, and in which order.
    pub selection: Selection,
}

/// An observer that serializes tagged counts to JSON.
///
/// By default the output is an array of `{"key", "count", "tags"}` objects.
/// With [`wrap_in_snapshot`](Self::wrap_in_snapshot) the array is placed under
/// `"records"` in a [`StoreSnapshot`] object, which can carry a timestamp.
///
/// # Examples
///
/// ```rust,ignore
/// use freqtag::observers::json::JsonObserver;
///
/// let observer = JsonObserver::new()
///     .pretty(true)
///     .wrap_in_snapshot(true)
///     .include_timestamp(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`StoreSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Sets which records are serialized and in which order.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.config.selection = selection;
        self
    }

    /// Reads `counter` and builds the snapshot to serialize.
    fn snapshot(&self, counter: &dyn TagCounter) -> StoreSnapshot {
        let records = self.config.selection.collect(counter);
        if self.config.include_timestamp {
            StoreSnapshot::with_timestamp(records, current_timestamp_ms())
        } else {
            StoreSnapshot::new(records)
        }
    }

    /// Serializes the selected records of `counter` to a JSON string.
    pub fn to_json(&self, counter: &dyn TagCounter) -> std::result::Result<String, serde_json::Error> {
        let snapshot = self.snapshot(counter);

        match (self.config.wrap_in_snapshot, self.config.pretty) {
            (true, true) => serde_json::to_string_pretty(&snapshot),
            (true, false) => serde_json::to_string(&snapshot),
            (false, true) => serde_json::to_string_pretty(&snapshot.records),
            (false, false) => serde_json::to_string(&snapshot.records),
        }
    }

    /// Serializes the selected records of `counter` to a JSON byte vector.
    pub fn to_json_bytes(
        &self,
        counter: &dyn TagCounter,
    ) -> std::result::Result<Vec<u8>, serde_json::Error> {
        let snapshot = self.snapshot(counter);

        if self.config.wrap_in_snapshot {
            serde_json::to_vec(&snapshot)
        } else {
            serde_json::to_vec(&snapshot.records)
        }
    }

    /// Writes the JSON document to `writer`, followed by a newline.
    pub fn write_to<W: Write>(&self, counter: &dyn TagCounter, mut writer: W) -> Result<()> {
        let json = self.to_json(counter)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }
}
