//! Error types for label file and store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, reading or persisting labels.
#[derive(Error, Debug)]
pub enum LabelError {
    /// I/O error during file operations
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// File or directory the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A label file line that is not `<class_id> <cx> <cy> <w> <h>`
    #[error("Malformed label line {line} in {path:?}: {reason}")]
    MalformedLine {
        /// Label file containing the line
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Image index outside the catalog
    #[error("Image index {index} out of range (catalog has {len} images)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Catalog size
        len: usize,
    },

    /// No image files in the images directory
    #[error("No image files found in {dir:?}")]
    EmptyCatalog {
        /// Directory that was scanned
        dir: PathBuf,
    },

    /// Two images that would share one label file
    #[error("Images '{first}' and '{second}' both map to label file '{stem}.txt'")]
    DuplicateStem {
        /// Shared stem
        stem: String,
        /// First image filename
        first: String,
        /// Second image filename
        second: String,
    },
}

impl LabelError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed line error.
    pub fn malformed_line(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
