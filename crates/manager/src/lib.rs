#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `manager` owns the parts of this workspace that talk to more than one
//! table at a time: [`ManagerRegistration`] (the ordered list of table
//! locations), the remote-table editor
//! ([`edit_remote_table`]/[`create_remote_table`]/[`read_remote_table`])
//! that lets every operation in [`ops`] treat a remote table location the
//! same as a local one, and [`Manager`], the reconciliation engine that
//! brings every registered table into agreement.
//!
//! # Design
//!
//! - The remote-table editor is a scoped higher-order wrapper: it
//!   materializes a local working copy in a temporary directory (released
//!   on every exit path), invokes the caller's mutator against that path,
//!   and copies the result back. [`ops`] builds every CLI-facing operation
//!   on top of it so none of them need to special-case remote locations.
//! - [`Manager::update`] implements the core reconciliation algorithm:
//!   gather every registered table, compute the union of entry names,
//!   select an authoritative replica per name by largest non-sentinel
//!   timestamp (registration order breaks ties), and dispatch the
//!   necessary copies through [`workers::WorkerPool`].
//!
//! # Errors
//!
//! All fallible operations return [`ManagerError`].
//!
//! # See also
//!
//! - [`protocol`] for path classification and the copy dispatcher.
//! - [`table`] for the data model this crate reconciles.
//! - [`workers`] for the parallel job handler backing [`Manager::update`]
//!   and [`ops::add_massive`].

mod error;
mod manager;
mod ops;
mod reconcile;
mod registration;
mod working_copy;

pub use error::ManagerError;
pub use manager::{Manager, DEFAULT_WORKER_COUNT};
pub use reconcile::{TransferFailure, UpdateReport};
pub use registration::ManagerRegistration;
pub use working_copy::{create_remote_table, edit_remote_table, read_remote_table, with_remote_working_copy};

pub use ops::{add, add_from_dir, add_massive, create, display, remove, replicate};
