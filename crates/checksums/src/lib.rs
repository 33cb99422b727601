#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `checksums` computes the stable hex fingerprint that [`table::FileMarks`]
//! persists alongside a file's modification timestamp. The algorithm is
//! SHA-256: deterministic across hosts, byte-exact on identical inputs, and
//! fixed at a 64-character lowercase hex width so the persisted sentinel
//! `"none"` (4 characters) can never collide with a real fingerprint.
//!
//! Unlike the teacher workspace's own `checksums` crate, which hand-rolls
//! MD4/MD5/XXH64 for byte-for-byte wire compatibility with the upstream C
//! `rsync` protocol, this crate has no such compatibility constraint — the
//! algorithm is an implementation detail here — so it reaches for the
//! ordinary ecosystem crate instead.
//!
//! # Errors
//!
//! [`HashError::Io`] is raised when the file cannot be opened or read.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//!
//! let mut file = tempfile::NamedTempFile::new().unwrap();
//! file.write_all(b"hello").unwrap();
//!
//! let digest = checksums::hash_file(file.path()).unwrap();
//! assert_eq!(digest.len(), checksums::DIGEST_HEX_WIDTH);
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Width, in hex characters, of a non-sentinel fingerprint.
pub const DIGEST_HEX_WIDTH: usize = 64;

/// The sentinel fingerprint for an unmaterialized entry.
pub const SENTINEL_FINGERPRINT: &str = "none";

/// Errors raised while hashing a local file.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Hashes the file at `path` and returns its lowercase hex fingerprint.
///
/// The returned string is always [`DIGEST_HEX_WIDTH`] characters long.
pub fn hash_file(path: impl AsRef<Path>) -> Result<String, HashError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| HashError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf).map_err(|source| HashError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Returns `true` if `fingerprint` is the sentinel value, i.e. the entry has
/// no materialized content yet.
#[must_use]
pub fn is_sentinel(fingerprint: &str) -> bool {
    fingerprint == SENTINEL_FINGERPRINT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn hash_is_deterministic() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(b"the quick brown fox").expect("write");

        let first = hash_file(file.path()).expect("hash");
        let second = hash_file(file.path()).expect("hash");
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_HEX_WIDTH);
    }

    #[test]
    fn different_contents_hash_differently() {
        let mut a = tempfile::NamedTempFile::new().expect("tmp file");
        let mut b = tempfile::NamedTempFile::new().expect("tmp file");
        a.write_all(b"alpha").expect("write");
        b.write_all(b"beta").expect("write");

        assert_ne!(
            hash_file(a.path()).expect("hash"),
            hash_file(b.path()).expect("hash")
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = hash_file("/nonexistent/path/for/checksums/test").unwrap_err();
        assert!(matches!(err, HashError::Io { .. }));
    }

    #[test]
    fn sentinel_is_never_hash_output() {
        // The sentinel's 4-character width can never match a real digest's
        // fixed 64-character width, so the two are always distinguishable.
        assert_ne!(SENTINEL_FINGERPRINT.len(), DIGEST_HEX_WIDTH);
        assert!(is_sentinel(SENTINEL_FINGERPRINT));
        assert!(!is_sentinel(&"a".repeat(DIGEST_HEX_WIDTH)));
    }
}
