#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `table` owns the data structures each host publishes: [`FileMarks`] (a
//! timestamp/fingerprint pair), [`FileInfo`] (one named entry), and
//! [`Table`] (the ordered manifest persisted as structured JSON). This
//! mirrors the role the teacher workspace's `flist` crate plays for its own
//! file-list format, scaled down to the much smaller manifest this system
//! needs.
//!
//! # Design
//!
//! - [`FileMarks::sentinel`] is the `(0.0, "none")` value that marks a
//!   "bare" entry: a declaration of where a file should live on some host,
//!   not yet backed by real content there.
//! - [`FileInfo`] is immutable; every mutation (principally
//!   [`FileInfo::refresh`]) returns a replacement value.
//! - [`Table::write`] always performs a whole-file replacement (write to a
//!   sibling temporary file, then rename), so a concurrent reader always
//!   sees either the old or the new table, never a torn one.
//!
//! # Errors
//!
//! All fallible operations return [`TableError`].
//!
//! # See also
//!
//! - [`protocol`] for path classification, reused by [`FileInfo::refresh`]
//!   and [`FileInfo::local_path`].
//! - [`checksums`] for the fingerprint algorithm.

mod error;
mod format;
mod info;
mod marks;
mod table;

pub use error::TableError;
pub use info::FileInfo;
pub use marks::FileMarks;
pub use table::Table;
