//! Table-mutating operations exposed to the command-line front-end. Each
//! wraps its mutation in [`crate::working_copy`] so `location` may be local
//! or remote transparently.

use std::num::NonZeroUsize;

use table::{FileInfo, Table};

use crate::error::ManagerError;
use crate::manager::Manager;
use crate::reconcile::UpdateReport;
use crate::registration::ManagerRegistration;
use crate::working_copy::{create_remote_table, edit_remote_table, read_remote_table};

/// Creates a new, empty table at `location` with the given `description`.
///
/// # Errors
///
/// Propagates any [`ManagerError`] raised while writing or uploading the
/// new table.
pub fn create(location: &str, description: &str) -> Result<(), ManagerError> {
    create_remote_table(location, |working| {
        Table::create(description).write(working).map_err(ManagerError::from)
    })
}

/// Adds a single entry to the table at `location`.
///
/// `path` is composed with `remote` and `bare` via [`protocol::compose_path`]
/// before being stored. When `bare` is `false`, the entry is stamped from
/// the local file if this host can reach it; when `true`, the entry is
/// always stored with sentinel marks.
///
/// # Errors
///
/// Propagates any [`ManagerError`] from path composition, table I/O, or
/// hashing.
pub fn add(
    location: &str,
    name: &str,
    path: &str,
    bare: bool,
    remote: Option<&str>,
) -> Result<(), ManagerError> {
    let qualified = protocol::compose_path(path, remote, bare)?;
    edit_remote_table(location, |working| {
        let mut table = Table::read(working)?;
        let info = if bare {
            FileInfo::bare(name, qualified)?
        } else {
            FileInfo::from_name_and_path(name, qualified)?
        };
        table.add(info);
        table.write(working)?;
        Ok(())
    })
}

/// Ingests many `(name, path)` entries in parallel, stamping each from the
/// local filesystem where reachable, and adds them all to the table at
/// `location`.
///
/// # Errors
///
/// Returns [`ManagerError::Worker`] (wrapping [`workers::WorkerError`]) if
/// any entry failed to stamp. Entries that succeeded are still added before
/// the error is returned only when every entry succeeded; on partial
/// failure no entries from this call are added, so a retry starts clean.
pub fn add_massive(
    location: &str,
    entries: &[(String, String)],
    nproc: NonZeroUsize,
    remote: Option<&str>,
) -> Result<(), ManagerError> {
    edit_remote_table(location, |working| {
        let mut table = Table::read(working)?;
        let mut pool: workers::WorkerPool<String, FileInfo> = workers::WorkerPool::new(nproc);

        for (name, path) in entries {
            let qualified = protocol::compose_path(path, remote, false)?;
            let name_for_task = name.clone();
            pool.submit(name.clone(), move || {
                FileInfo::from_name_and_path(name_for_task, qualified).map_err(|err| err.to_string())
            })?;
        }

        let _ = pool.process();
        let mut failures = Vec::new();
        let mut stamped = Vec::with_capacity(entries.len());
        for result in pool.drain_results() {
            match result.outcome {
                Ok(info) => stamped.push(info),
                Err(reason) => failures.push(reason),
            }
        }

        if !failures.is_empty() {
            return Err(ManagerError::from(workers::WorkerError::TasksFailed { failures }));
        }

        for info in stamped {
            table.add(info);
        }
        table.write(working)?;
        Ok(())
    })
}

/// Walks `dir` and ingests every regular file found under it, using each
/// file's stem (name without extension) as its table entry name.
///
/// # Errors
///
/// Returns [`ManagerError::DirWalk`] if the directory cannot be traversed,
/// or any error from [`add_massive`].
pub fn add_from_dir(
    location: &str,
    dir: &str,
    nproc: NonZeroUsize,
    remote: Option<&str>,
) -> Result<(), ManagerError> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|err| ManagerError::DirWalk {
            path: dir.to_string(),
            reason: err.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        entries.push((name, entry.path().display().to_string()));
    }
    add_massive(location, &entries, nproc, remote)
}

/// Removes entries from the table at `location` matching `pattern`,
/// returning the number of entries removed.
///
/// # Errors
///
/// Returns [`ManagerError::Table`] if `as_regex` is `true` and `pattern` is
/// not a valid regular expression.
pub fn remove(location: &str, pattern: &str, as_regex: bool) -> Result<usize, ManagerError> {
    edit_remote_table(location, |working| {
        let mut table = Table::read(working)?;
        let removed = table.remove(pattern, as_regex)?;
        table.write(working)?;
        Ok(removed)
    })
}

/// Reads the table at `location` for display, without modifying it.
///
/// # Errors
///
/// Propagates any [`ManagerError`] from fetching or parsing the table.
pub fn display(location: &str) -> Result<Table, ManagerError> {
    read_remote_table(location, |working| Table::read(working).map_err(ManagerError::from))
}

/// Ingests `entries` into the table at `location`, then synchronizes every
/// table registered in `registration` (which should include `location`).
///
/// # Errors
///
/// Propagates any error from [`add_massive`] or [`Manager::update`].
pub fn replicate(
    registration: &ManagerRegistration,
    location: &str,
    entries: &[(String, String)],
    nproc: NonZeroUsize,
    remote: Option<&str>,
    worker_count: NonZeroUsize,
) -> Result<UpdateReport, ManagerError> {
    add_massive(location, entries, nproc, remote)?;
    Manager::with_worker_count(registration.clone(), worker_count).update()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_add_then_display_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("t.json");
        let location = location.to_str().unwrap();

        create(location, "a test table").unwrap();

        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();
        add(location, "a", file.to_str().unwrap(), false, None).unwrap();

        let table = display(location).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.get("a").unwrap().marks().is_sentinel());
    }

    #[test]
    fn add_bare_remote_composes_qualified_path() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("t.json");
        let location = location.to_str().unwrap();
        create(location, "").unwrap();

        add(location, "file1", "files/file1.txt", true, Some("user@h")).unwrap();

        let table = display(location).unwrap();
        let entry = table.get("file1").unwrap();
        assert_eq!(entry.path(), "user@h:/files/file1.txt");
        assert!(entry.marks().is_sentinel());
    }

    #[test]
    fn add_massive_ingests_every_entry_by_basename() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("t.json");
        let location = location.to_str().unwrap();
        create(location, "").unwrap();

        let mut entries = Vec::new();
        for i in 0..12 {
            let file = dir.path().join(format!("run-{i}.dat"));
            std::fs::write(&file, format!("payload {i}")).unwrap();
            entries.push((format!("run-{i}"), file.to_str().unwrap().to_string()));
        }

        add_massive(location, &entries, NonZeroUsize::new(4).unwrap(), None).unwrap();

        let table = display(location).unwrap();
        assert_eq!(table.len(), 12);
        for i in 0..12 {
            assert!(table.get(&format!("run-{i}")).is_some());
        }
    }

    #[test]
    fn remove_by_regex_drops_matching_entries() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("t.json");
        let location = location.to_str().unwrap();
        create(location, "").unwrap();
        add(location, "keep", "/tmp/keep", true, None).unwrap();
        add(location, "drop-1", "/tmp/drop1", true, None).unwrap();
        add(location, "drop-2", "/tmp/drop2", true, None).unwrap();

        let removed = remove(location, "^drop-", true).unwrap();
        assert_eq!(removed, 2);

        let table = display(location).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("keep").is_some());
    }
}
