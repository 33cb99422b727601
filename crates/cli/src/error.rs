//! [`CliError`]: argument-level errors that arise before the core is
//! reached.

use thiserror::Error;

/// Errors raised while parsing this crate's own argument conventions, on
/// top of whatever `clap` itself rejects.
#[derive(Debug, Error)]
pub enum CliError {
    /// A `--file NAME=PATH` argument did not contain the `=` separator.
    #[error("invalid --file argument {0:?}: expected NAME=PATH")]
    InvalidFileSpec(String),

    /// A core operation failed.
    #[error(transparent)]
    Manager(#[from] manager::ManagerError),
}
