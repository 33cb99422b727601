//! [`ManagerError`]: the unified error type for registration, remote-table
//! editing, and synchronization.

use thiserror::Error;

use crate::reconcile::UpdateReport;

/// Errors raised by [`crate::ManagerRegistration`], [`crate::edit_remote_table`]
/// and [`crate::create_remote_table`], and [`crate::Manager`].
#[derive(Debug, Error)]
pub enum ManagerError {
    /// A location was registered twice.
    #[error("location {0:?} is already registered")]
    DuplicateLocation(String),

    /// [`crate::Manager::available_table`] found no registered location
    /// reachable on this host.
    #[error("no registered table location is reachable on this host")]
    NoLocalReplica,

    /// Every scheduled transfer during [`crate::Manager::update`] failed.
    /// The accompanying report describes each failure.
    #[error("all {} scheduled transfer(s) failed", .report.failures.len())]
    AllTransfersFailed {
        /// The full per-entry failure report.
        report: UpdateReport,
    },

    /// A path or transfer operation failed.
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),

    /// A table read, write, or mutation failed.
    #[error(transparent)]
    Table(#[from] table::TableError),

    /// The parallel job handler reported a failure.
    #[error(transparent)]
    Worker(#[from] workers::WorkerError),

    /// Walking a directory for `add_from_dir` failed.
    #[error("failed to walk directory {path}: {reason}")]
    DirWalk {
        /// Root directory that failed to walk.
        path: String,
        /// Human-readable description of the problem.
        reason: String,
    },
}
