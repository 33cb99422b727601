#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `protocol` classifies a path string as local, SSH, or XRootD, composes
//! protocol-qualified paths, and dispatches file copies between any pair of
//! endpoints to the right external tool. It is the layer every other crate
//! in this workspace goes through instead of sniffing path strings itself.
//!
//! # Design
//!
//! - [`Protocol`] is the sum-typed classification returned by [`classify`].
//! - [`available_local_path`] answers "can this host read this path
//!   directly?", which [`manager`](../manager/index.html) uses to pick which
//!   registered table lives on the current host.
//! - [`compose_path`] builds a protocol-qualified path from a bare
//!   filesystem path and an optional remote prefix.
//! - [`copy`] executes a transfer, routing SSH-to-XRootD pairs through a
//!   local staging file since no single tool speaks both protocols.
//!
//! # Invariants
//!
//! - For every path, exactly one of [`Protocol::is_local`],
//!   [`Protocol::is_ssh`], [`Protocol::is_xrootd`] holds.
//! - An XRootD path is never considered locally addressable.
//! - Staging temporary files created during an SSH↔XRootD copy are removed
//!   on every exit path, including error returns.
//!
//! # Errors
//!
//! All fallible operations return [`ProtocolError`]. A non-zero exit status
//! from an external copy tool surfaces as [`ProtocolError::Transfer`].
//!
//! # See also
//!
//! - [`checksums`](../checksums/index.html) for the fingerprint used to
//!   decide whether a copy is actually needed.
//! - [`manager`](../manager/index.html) for the reconciliation loop that
//!   drives [`copy`].

mod classify;
mod copy;
mod error;
mod path;

pub use classify::{available_local_path, classify, Protocol};
pub use copy::copy;
pub use error::ProtocolError;
pub use path::{compose_path, local_path};
