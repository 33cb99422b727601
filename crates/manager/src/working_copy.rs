//! The scoped "fetch / edit locally / push back" wrapper around any
//! table-mutating operation whose `location` might be remote.

use std::path::{Path, PathBuf};

use crate::error::ManagerError;

pub(crate) fn working_file_name(location: &str) -> String {
    let safe: String = location
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{safe}.table.json")
}

/// Runs `body` against a local working copy of the table at `location`,
/// materializing and releasing that working copy as needed.
///
/// If `location` is local, `body` runs directly against it: no temporary
/// directory is created. If `location` is remote, a scoped temporary
/// directory is created; when `fetch_existing` is `true` the remote table is
/// copied in before `body` runs, then (regardless) the working copy is
/// copied back to `location` after `body` succeeds. The temporary directory
/// is released on every exit path, including when `body` returns an error.
///
/// # Errors
///
/// Propagates any [`protocol::ProtocolError`] from fetching or pushing back,
/// and any error `body` itself returns.
pub fn with_remote_working_copy<T>(
    location: &str,
    fetch_existing: bool,
    body: impl FnOnce(&Path) -> Result<T, ManagerError>,
) -> Result<T, ManagerError> {
    let classified = protocol::classify(location);
    if classified.is_local() {
        return body(protocol::local_path(location).as_path());
    }

    let scope = tempfile::tempdir().map_err(protocol::ProtocolError::from)?;
    let working_path: PathBuf = scope.path().join(working_file_name(location));

    if fetch_existing {
        protocol::copy(location, &working_path.display().to_string())?;
    }

    let result = body(&working_path)?;

    protocol::copy(&working_path.display().to_string(), location)?;
    Ok(result)
}

/// Runs `body` against a freshly created local working copy, then uploads
/// it to `location`. Unlike [`with_remote_working_copy`], no existing remote
/// content is fetched first, matching the `create` operation's contract: the
/// table at `location` may not exist yet.
///
/// # Errors
///
/// See [`with_remote_working_copy`].
pub fn create_remote_table<T>(
    location: &str,
    body: impl FnOnce(&Path) -> Result<T, ManagerError>,
) -> Result<T, ManagerError> {
    with_remote_working_copy(location, false, body)
}

/// Runs `body` against the existing table at `location`, fetching it first
/// if remote and pushing the edited result back.
///
/// # Errors
///
/// See [`with_remote_working_copy`].
pub fn edit_remote_table<T>(
    location: &str,
    body: impl FnOnce(&Path) -> Result<T, ManagerError>,
) -> Result<T, ManagerError> {
    with_remote_working_copy(location, true, body)
}

/// Runs `body` against a fetched working copy of `location` without pushing
/// anything back, for read-only operations such as `display`.
///
/// # Errors
///
/// See [`with_remote_working_copy`].
pub fn read_remote_table<T>(
    location: &str,
    body: impl FnOnce(&Path) -> Result<T, ManagerError>,
) -> Result<T, ManagerError> {
    let classified = protocol::classify(location);
    if classified.is_local() {
        return body(protocol::local_path(location).as_path());
    }

    let scope = tempfile::tempdir().map_err(protocol::ProtocolError::from)?;
    let working_path = scope.path().join(working_file_name(location));
    protocol::copy(location, &working_path.display().to_string())?;
    body(&working_path)
}
