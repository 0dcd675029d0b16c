//! Table observer for pretty-printing tagged counts.
//!
//! This module provides [`TableObserver`], which renders the records of a
//! [`TagCounter`] as a formatted ASCII table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! freqtag = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use freqtag::observers::table::{TableObserver, TableStyle};
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//! store.add("hello", "a.txt");
//! store.add("hello", "b.txt");
//! store.add("world", "a.txt");
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(&store));
//! // ╭───────┬───────┬─────────────╮
//! // │ Key   │ Count │ Tags        │
//! // ├───────┼───────┼─────────────┤
//! // │ hello │ 2     │ a.txt b.txt │
//! // │ world │ 1     │ a.txt       │
//! // ╰───────┴───────┴─────────────╯
//! ```

use crate::observers::Selection;
use crate::store::{TagCounter, TagRecord};
use tabled::{settings::Style, Table, Tabled};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row.
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
    /// Separator placed between tags in the Tags column.
    pub tag_separator: String,
    /// Which records to show, and in which order.
    pub selection: Selection,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            tag_separator: " ".to_string(),
            selection: Selection::default(),
        }
    }
}

/// Internal row representation for tabled.
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Tags")]
    tags: String,
}

/// An observer that renders tagged counts as a formatted ASCII table.
///
/// # Examples
///
/// ```rust,ignore
/// use freqtag::observers::table::{TableObserver, TableStyle};
/// use freqtag::observers::{RecordOrder, Selection};
///
/// let observer = TableObserver::new()
///     .with_style(TableStyle::Markdown)
///     .with_title("Duplicated lines")
///     .with_selection(Selection::new().order(RecordOrder::CountDesc).min_count(2));
///
/// let output = observer.render(&store);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    ///
    /// Default style is [`TableStyle::Rounded`], with a header and every
    /// record sorted by key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title for the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Sets the separator placed between tags.
    pub fn tag_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.tag_separator = separator.into();
        self
    }

    /// Sets which records are shown and in which order.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.config.selection = selection;
        self
    }

    /// Applies the configured style to a table.
    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Dots => {
                table.with(Style::dots());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    /// Renders already collected records, in the order given.
    pub fn render_records(&self, records: &[TagRecord]) -> String {
        let rows: Vec<RecordRow> = records
            .iter()
            .map(|record| RecordRow {
                key: record.key.clone(),
                count: record.count,
                tags: record.tags.join(&self.config.tag_separator),
            })
            .collect();

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        if let Some(ref title) = self.config.title {
            format!("{}\n{}", title, table)
        } else {
            table.to_string()
        }
    }

    /// Renders the selected records of `counter` as a table string.
    pub fn render(&self, counter: &dyn TagCounter) -> String {
        self.render_records(&self.config.selection.collect(counter))
    }
}
