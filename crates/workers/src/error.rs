//! [`WorkerError`]: the aggregated failure raised by [`crate::WorkerPool::process`].

use thiserror::Error;

/// Raised by [`crate::WorkerPool::process`] once every outstanding task has
/// been drained, if one or more of them failed.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// At least one task failed; `failures` holds one message per failure,
    /// in completion order.
    #[error("{} of the submitted tasks failed: {}", failures.len(), failures.join("; "))]
    TasksFailed {
        /// One human-readable message per failed task.
        failures: Vec<String>,
    },

    /// A task was submitted after a previous call to
    /// [`crate::WorkerPool::process`] reported a failure. The pool is not
    /// reusable past that point.
    #[error("worker pool already failed in a previous round and cannot accept more work")]
    Poisoned,

    /// A worker thread terminated without reporting a result for a task it
    /// had accepted, which can only happen if a worker itself panicked.
    #[error("a worker thread stopped responding before completing its task")]
    WorkerLost,
}
