//! Error type for reading input sources.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read one input source.
///
/// A failed source never aborts the others: [`count_sources`](super::count_sources)
/// logs the error, records it in the summary and moves on.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path of the source.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading failed part way through the source.
    ///
    /// Lines read before the failure stay counted.
    #[error("cannot read {source_name} after {lines} lines: {source}")]
    Read {
        /// Tag of the source being read.
        source_name: String,
        /// Lines counted before the failure.
        lines: u64,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl IngestError {
    /// Returns the name of the source that failed.
    pub fn source_name(&self) -> String {
        match self {
            IngestError::Open { path, .. } => path.display().to_string(),
            IngestError::Read { source_name, .. } => source_name.clone(),
        }
    }

    /// Returns the number of lines counted from the source before it failed.
    pub fn lines_counted(&self) -> u64 {
        match self {
            IngestError::Open { .. } => 0,
            IngestError::Read { lines, .. } => *lines,
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
