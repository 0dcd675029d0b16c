//! Plain text observer.
//!
//! Renders one line per record in the `key count [tag1 tag2]` form of
//! [`TagRecord`]'s `Display`. This is the format to pipe into other line
//! tools.

use std::io::Write;

use crate::observers::{Result, Selection};
use crate::store::{TagCounter, TagRecord};

/// An observer that renders records as plain text lines.
///
/// # Examples
///
/// ```rust
/// use freqtag::observers::text::TextObserver;
/// use freqtag::store::sharded::ShardedTaggedCounterStore;
/// use freqtag::store::TagCounter;
///
/// let store = ShardedTaggedCounterStore::new();
/// store.add("hello", "a.txt");
///
/// let mut out = Vec::new();
/// TextObserver::new().write_to(&store, &mut out).unwrap();
/// assert_eq!(out, b"hello 1 [a.txt]\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextObserver {
    selection: Selection,
}

impl TextObserver {
    /// Creates a text observer reporting every record, sorted by key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets which records are reported and in which order.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Renders already collected records, in the order given.
    pub fn render_records(&self, records: &[TagRecord]) -> String {
        let mut output = String::new();
        for record in records {
            output.push_str(&record.to_string());
            output.push('\n');
        }
        output
    }

    /// Renders the selected records of `counter`, one per line.
    pub fn render(&self, counter: &dyn TagCounter) -> String {
        self.render_records(&self.selection.collect(counter))
    }

    /// Writes the selected records of `counter` to `writer`, one per line.
    pub fn write_to<W: Write>(&self, counter: &dyn TagCounter, mut writer: W) -> Result<()> {
        for record in self.selection.collect(counter) {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::RecordOrder;
    use crate::store::locked::TaggedCounterStore;

    fn sample_store() -> TaggedCounterStore {
        let store = TaggedCounterStore::new();
        store.add("x", "f1");
        store.add("y", "f1");
        store.add("x", "f2");
        store.add("x", "f1");
        store
    }

    #[test]
    fn test_render_empty() {
        let store = TaggedCounterStore::new();
        assert_eq!(TextObserver::new().render(&store), "");
    }

    #[test]
    fn test_render_sorted_by_key() {
        let output = TextObserver::new().render(&sample_store());
        assert_eq!(output, "x 3 [f1 f2]\ny 1 [f1]\n");
    }

    #[test]
    fn test_render_count_desc_with_min_count() {
        let store = sample_store();
        store.add("z", "f3");
        store.add("z", "f3");

        let observer = TextObserver::new()
            .with_selection(Selection::new().order(RecordOrder::CountDesc).min_count(2));
        assert_eq!(observer.render(&store), "x 3 [f1 f2]\nz 2 [f3]\n");
    }

    #[test]
    fn test_render_records_keeps_order() {
        let records = vec![
            TagRecord::new("b", 1, vec!["t".into()]),
            TagRecord::new("a", 1, vec!["t".into()]),
        ];
        assert_eq!(TextObserver::new().render_records(&records), "b 1 [t]\na 1 [t]\n");
    }

    #[test]
    fn test_write_to() {
        let mut out = Vec::new();
        TextObserver::new().write_to(&sample_store(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x 3 [f1 f2]\ny 1 [f1]\n");
    }

    #[test]
    fn test_write_to_failing_writer() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = TextObserver::new().write_to(&sample_store(), Broken).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
