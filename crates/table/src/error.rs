//! Error type for table entries and table persistence.

use thiserror::Error;

/// Errors raised by [`crate::FileMarks`], [`crate::FileInfo`], and
/// [`crate::Table`].
#[derive(Debug, Error)]
pub enum TableError {
    /// A name was empty, contained whitespace, or was already present
    /// where uniqueness is required.
    #[error("invalid entry name {0:?}")]
    InvalidName(String),

    /// Attempted to add an entry whose name already exists via a
    /// strict-add operation.
    #[error("an entry named {0:?} already exists")]
    DuplicateName(String),

    /// A [`crate::FileMarks`] value violated its invariant (negative
    /// timestamp, or a fingerprint that is neither `"none"` nor a
    /// lowercase hex string of the expected width).
    #[error("invalid marks: {0}")]
    InvalidMarks(String),

    /// The table file was malformed.
    #[error("malformed table file {path}: {reason}")]
    Format {
        /// Path of the malformed file.
        path: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// Reading or writing the table file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that could not be read or written.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An entry's `remove` pattern was an invalid regular expression.
    #[error("invalid removal pattern {0:?}: {1}")]
    InvalidPattern(String, String),
}
