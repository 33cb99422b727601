//! Error type for path classification and copy dispatch.

use thiserror::Error;

/// Errors raised by the protocol layer.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An operation required a path this host can reach directly, but the
    /// path given is unreachable here.
    #[error("path is not reachable on this host: {0}")]
    NonLocalPath(String),

    /// A copy tool exited with a non-zero status, or could not be spawned.
    #[error("transfer failed for {src} -> {dst}: {reason}")]
    Transfer {
        /// Source path as given to [`crate::copy`].
        src: String,
        /// Destination path as given to [`crate::copy`].
        dst: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// A path or remote prefix did not match any recognised protocol
    /// grammar.
    #[error("path does not match any known protocol grammar: {0}")]
    Format(String),

    /// Reading, writing, or staging a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
