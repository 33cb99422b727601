//! [`FileMarks`]: the `(timestamp, fingerprint)` pair of a table entry.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// The sentinel marks value, denoting an unmaterialized ("bare") entry.
pub const SENTINEL_TIMESTAMP: f64 = 0.0;

/// A file's modification timestamp and content fingerprint.
///
/// The sentinel value `(0.0, "none")`, returned by [`FileMarks::sentinel`],
/// denotes a "bare" declaration of where a file should live on some host
/// without yet being backed by real content there.
///
/// Invariant: `timestamp >= 0.0`; `fingerprint` is either `"none"` or a
/// lowercase hex string of [`checksums::DIGEST_HEX_WIDTH`] characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileMarks {
    tmstp: f64,
    fid: String,
}

impl FileMarks {
    /// Constructs marks from a timestamp and fingerprint, validating the
    /// invariant.
    pub fn new(timestamp: f64, fingerprint: impl Into<String>) -> Result<Self, TableError> {
        let fingerprint = fingerprint.into();
        if timestamp < 0.0 {
            return Err(TableError::InvalidMarks(format!(
                "timestamp {timestamp} is negative"
            )));
        }
        if fingerprint != checksums::SENTINEL_FINGERPRINT {
            let valid_width = fingerprint.len() == checksums::DIGEST_HEX_WIDTH;
            let valid_chars = fingerprint
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
            if !valid_width || !valid_chars {
                return Err(TableError::InvalidMarks(format!(
                    "fingerprint {fingerprint:?} is neither \"none\" nor a {}-character lowercase hex string",
                    checksums::DIGEST_HEX_WIDTH
                )));
            }
        }
        Ok(Self {
            tmstp: timestamp,
            fid: fingerprint,
        })
    }

    /// Returns the sentinel marks `(0.0, "none")`.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            tmstp: SENTINEL_TIMESTAMP,
            fid: checksums::SENTINEL_FINGERPRINT.to_string(),
        }
    }

    /// Returns the timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.tmstp
    }

    /// Returns the fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fid
    }

    /// Returns `true` if these are the sentinel marks.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        checksums::is_sentinel(&self.fid)
    }
}
