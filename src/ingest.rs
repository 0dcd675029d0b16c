//! Reading lines from input sources into a tagged counter.
//!
//! Every line of a source is counted once, tagged with the name of the source
//! it came from. After all sources are read, a key's tags tell which sources
//! contain that line and its count tells how often it occurred overall.
//!
//! Sources are independent, so [`count_sources`] reads them in parallel on a
//! bounded pool of scoped threads, all writing into the same store:
//!
//! ```text
//!   a.txt ──► worker 0 ──┐
//!   b.txt ──► worker 1 ──┼──► add(line, source) ──► &dyn TagCounter
//!   c.txt ──► worker 0 ──┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use freqtag::ingest::count_lines;
//! use freqtag::store::locked::TaggedCounterStore;
//! use freqtag::store::TagCounter;
//!
//! let store = TaggedCounterStore::new();
//! count_lines("one\ntwo\none\n".as_bytes(), "input", &store).unwrap();
//!
//! assert_eq!(store.get("one").count, 2);
//! assert_eq!(store.get("one").tags, vec!["input"]);
//! ```

mod error;

pub use error::{IngestError, Result};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;

use crate::store::TagCounter;

/// Tag used for lines read from standard input.
pub const STDIN_SOURCE: &str = "/dev/stdin";

/// Configuration for [`count_sources`].
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Maximum number of worker threads. Values below 1 are treated as 1.
    pub workers: usize,
}

impl Default for IngestConfig {
    /// Uses one worker per available CPU.
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl IngestConfig {
    /// Creates a configuration with the default number of workers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of worker threads.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Outcome of a [`count_sources`] run.
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Number of sources read to the end.
    pub sources_read: usize,
    /// Number of lines counted, including lines of sources that failed part way.
    ///
    /// This always matches the number of `add` calls made on the counter.
    pub lines: u64,
    /// Sources that could not be read, in the order they were given.
    pub failures: Vec<IngestError>,
}

impl IngestSummary {
    /// Returns `true` if every source was read successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Counts every line of `reader` into `counter`, tagged with `source_name`.
///
/// Line terminators (`\n` and `\r\n`) are stripped; a last line without a
/// terminator is still counted. Bytes that are not valid UTF-8 are replaced
/// with `U+FFFD` rather than failing the source.
///
/// Returns the number of lines counted. On a read error, the lines before it
/// remain in `counter`.
pub fn count_lines<R: BufRead>(
    mut reader: R,
    source_name: &str,
    counter: &dyn TagCounter,
) -> Result<u64> {
    let mut buf = Vec::new();
    let mut lines: u64 = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| IngestError::Read {
                source_name: source_name.to_owned(),
                lines,
                source,
            })?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(trim_line_end(&buf));
        counter.add(&line, source_name);
        lines += 1;
    }

    Ok(lines)
}

/// Opens `path` and counts its lines, tagged with the path as displayed.
pub fn count_file(path: &Path, counter: &dyn TagCounter) -> Result<u64> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    count_lines(BufReader::new(file), &path.display().to_string(), counter)
}

/// Counts the lines of every path into `counter`, reading in parallel.
///
/// At most `config.workers` threads are started, and never more than there
/// are paths. A source that fails is logged, recorded in
/// [`IngestSummary::failures`] and skipped; the others are still read.
pub fn count_sources(
    paths: &[PathBuf],
    counter: &dyn TagCounter,
    config: &IngestConfig,
) -> IngestSummary {
    let workers = config.workers.max(1).min(paths.len());
    let next = AtomicUsize::new(0);
    let progress = Mutex::new(Progress::default());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let idx = next.fetch_add(1, Ordering::Relaxed);
                let Some(path) = paths.get(idx) else {
                    break;
                };

                match count_file(path, counter) {
                    Ok(lines) => {
                        tracing::debug!(source = %path.display(), lines, "source counted");
                        progress.lock().succeeded(lines);
                    }
                    Err(err) => {
                        tracing::warn!(source = %path.display(), error = %err, "skipping source");
                        progress.lock().failed(idx, err);
                    }
                }
            });
        }
    });

    let summary = progress.into_inner().finish();
    tracing::debug!(
        sources = paths.len(),
        workers,
        lines = summary.lines,
        failed = summary.failures.len(),
        "ingest finished"
    );
    summary
}

/// Shared accumulator for the workers of [`count_sources`].
#[derive(Default)]
struct Progress {
    sources_read: usize,
    lines: u64,
    failures: Vec<(usize, IngestError)>,
}

impl Progress {
    fn succeeded(&mut self, lines: u64) {
        self.sources_read += 1;
        self.lines += lines;
    }

    fn failed(&mut self, idx: usize, err: IngestError) {
        self.lines += err.lines_counted();
        self.failures.push((idx, err));
    }

    fn finish(mut self) -> IngestSummary {
        self.failures.sort_by_key(|(idx, _)| *idx);
        IngestSummary {
            sources_read: self.sources_read,
            lines: self.lines,
            failures: self.failures.into_iter().map(|(_, err)| err).collect(),
        }
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::locked::TaggedCounterStore;
    use crate::store::sharded::ShardedTaggedCounterStore;
    use std::io::{self, Read, Write};
    use tempfile::NamedTempFile;

    fn temp_source(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// Reader that yields some data and then fails.
    struct FailingReader {
        data: &'static [u8],
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_count_lines() {
        let store = TaggedCounterStore::new();
        let lines = count_lines("a\nb\na\n".as_bytes(), "src", &store).unwrap();

        assert_eq!(lines, 3);
        assert_eq!(store.get("a").count, 2);
        assert_eq!(store.get("b").count, 1);
        assert_eq!(store.get("a").tags, vec!["src"]);
    }

    #[test]
    fn test_count_lines_strips_crlf_and_keeps_last_line() {
        let store = TaggedCounterStore::new();
        let lines = count_lines("a\r\nb\r\na".as_bytes(), "src", &store).unwrap();

        assert_eq!(lines, 3);
        assert_eq!(store.get("a").count, 2);
        assert_eq!(store.get("b").count, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_count_lines_empty_lines_are_keys() {
        let store = TaggedCounterStore::new();
        count_lines("\n\nx\n".as_bytes(), "src", &store).unwrap();

        assert_eq!(store.get("").count, 2);
        assert_eq!(store.get("x").count, 1);
    }

    #[test]
    fn test_count_lines_empty_input() {
        let store = TaggedCounterStore::new();
        assert_eq!(count_lines("".as_bytes(), "src", &store).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_count_lines_invalid_utf8() {
        let store = TaggedCounterStore::new();
        count_lines(&b"ok\n\xff\n"[..], "src", &store).unwrap();

        assert_eq!(store.get("ok").count, 1);
        assert_eq!(store.get("\u{FFFD}").count, 1);
    }

    #[test]
    fn test_count_lines_read_error_keeps_earlier_lines() {
        let store = TaggedCounterStore::new();
        let reader = BufReader::new(FailingReader { data: b"first\nsecond\n" });

        let err = count_lines(reader, "flaky", &store).unwrap_err();

        assert!(matches!(err, IngestError::Read { lines: 2, .. }));
        assert_eq!(err.source_name(), "flaky");
        assert_eq!(err.lines_counted(), 2);
        assert_eq!(store.get("first").count, 1);
        assert_eq!(store.get("second").count, 1);
    }

    #[test]
    fn test_summary_counts_lines_of_partly_read_source() {
        let store = TaggedCounterStore::new();
        let mut progress = Progress::default();

        let ok = count_lines("a\nb\nc\n".as_bytes(), "whole", &store).unwrap();
        progress.succeeded(ok);
        let reader = BufReader::new(FailingReader { data: b"a\nd\n" });
        progress.failed(1, count_lines(reader, "flaky", &store).unwrap_err());
        let missing = count_file(Path::new("/missing/source"), &store).unwrap_err();
        progress.failed(0, missing);

        let summary = progress.finish();
        assert_eq!(summary.sources_read, 1);
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].source_name(), "/missing/source");
        assert_eq!(summary.failures[1].source_name(), "flaky");

        let added: u64 = store.get_all().iter().map(|r| r.count).sum();
        assert_eq!(summary.lines, added);
        assert_eq!(store.get("a").tags, vec!["flaky", "whole"]);
    }

    #[test]
    fn test_count_file_missing() {
        let store = TaggedCounterStore::new();
        let err = count_file(Path::new("/definitely/not/here.txt"), &store).unwrap_err();

        assert!(matches!(err, IngestError::Open { .. }));
        assert_eq!(err.lines_counted(), 0);
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_count_sources_tags_by_file() {
        let a = temp_source("shared\nonly-a\n");
        let b = temp_source("shared\nshared\n");
        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];

        let store = TaggedCounterStore::new();
        let summary = count_sources(&paths, &store, &IngestConfig::new().workers(2));

        assert!(summary.is_complete());
        assert_eq!(summary.sources_read, 2);
        assert_eq!(summary.lines, 4);

        let shared = store.get("shared");
        assert_eq!(shared.count, 3);
        let mut expected = vec![a.path().display().to_string(), b.path().display().to_string()];
        expected.sort();
        assert_eq!(shared.tags, expected);

        assert_eq!(store.get("only-a").tags, vec![a.path().display().to_string()]);
    }

    #[test]
    fn test_count_sources_skips_missing() {
        let good = temp_source("line\n");
        let paths = vec![
            PathBuf::from("/missing/one"),
            good.path().to_path_buf(),
            PathBuf::from("/missing/two"),
        ];

        let store = ShardedTaggedCounterStore::new();
        let summary = count_sources(&paths, &store, &IngestConfig::new().workers(3));

        assert!(!summary.is_complete());
        assert_eq!(summary.sources_read, 1);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].source_name(), "/missing/one");
        assert_eq!(summary.failures[1].source_name(), "/missing/two");
        assert_eq!(store.get("line").count, 1);
    }

    #[test]
    fn test_count_sources_many_files_few_workers() {
        let files: Vec<_> = (0..10).map(|i| temp_source(&format!("common\nfile-{i}\n"))).collect();
        let paths: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();

        let store = TaggedCounterStore::new();
        let summary = count_sources(&paths, &store, &IngestConfig::new().workers(3));

        assert_eq!(summary.sources_read, 10);
        assert_eq!(summary.lines, 20);
        assert_eq!(store.get("common").count, 10);
        assert_eq!(store.get("common").tags.len(), 10);
        assert_eq!(store.len(), 11);
    }

    #[test]
    fn test_count_sources_no_paths() {
        let store = TaggedCounterStore::new();
        let summary = count_sources(&[], &store, &IngestConfig::default());

        assert!(summary.is_complete());
        assert_eq!(summary.sources_read, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_config_workers_min_value() {
        assert_eq!(IngestConfig::new().workers(0).workers, 1);
        assert!(IngestConfig::default().workers >= 1);
    }
}
