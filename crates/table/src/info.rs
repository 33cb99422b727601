//! [`FileInfo`]: one row of a [`crate::Table`].

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::error::TableError;
use crate::marks::FileMarks;

/// One entry in a [`crate::Table`]: a logical name, a protocol-qualified
/// path, and the marks describing the replica's last known state.
///
/// `path` never changes for a given entry once written by a user; only
/// `marks` are refreshed. Every mutation yields a replacement value;
/// `FileInfo` itself is treated as immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct FileInfo {
    name: String,
    path: String,
    marks: FileMarks,
}

fn validate_name(name: &str) -> Result<(), TableError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(TableError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn stamp_from_local_file(path: &str) -> FileMarks {
    let Some(local) = protocol::available_local_path(path) else {
        return FileMarks::sentinel();
    };
    stamp_existing_file(&local).unwrap_or_else(|_| FileMarks::sentinel())
}

fn stamp_existing_file(local: &std::path::Path) -> Result<FileMarks, TableError> {
    let metadata = std::fs::metadata(local).map_err(|source| TableError::Io {
        path: local.display().to_string(),
        source,
    })?;
    let modified = metadata.modified().map_err(|source| TableError::Io {
        path: local.display().to_string(),
        source,
    })?;
    let tmstp = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    let fid = checksums::hash_file(local).map_err(|err| TableError::Io {
        path: local.display().to_string(),
        source: std::io::Error::other(err.to_string()),
    })?;
    FileMarks::new(tmstp, fid)
}

impl FileInfo {
    /// Constructs a `FileInfo`, stamping real marks when `path` is locally
    /// available and falling back to the sentinel marks otherwise. This
    /// never fails because of local unavailability; it yields a bare entry.
    pub fn from_name_and_path(name: impl Into<String>, path: impl Into<String>) -> Result<Self, TableError> {
        let name = name.into();
        let path = path.into();
        validate_name(&name)?;
        let marks = stamp_from_local_file(&path);
        Ok(Self { name, path, marks })
    }

    /// Constructs a `FileInfo` with explicit sentinel marks, regardless of
    /// whether `path` happens to be locally available.
    pub fn bare(name: impl Into<String>, path: impl Into<String>) -> Result<Self, TableError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            path: path.into(),
            marks: FileMarks::sentinel(),
        })
    }

    /// Constructs a `FileInfo` by direct hydration from persisted fields.
    pub fn from_fields(
        name: impl Into<String>,
        path: impl Into<String>,
        marks: FileMarks,
    ) -> Result<Self, TableError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            path: path.into(),
            marks,
        })
    }

    /// The logical name, unique within a table.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The protocol-qualified path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current marks.
    #[must_use]
    pub const fn marks(&self) -> &FileMarks {
        &self.marks
    }

    /// Returns the filesystem-level path, stripped of any protocol prefix.
    #[must_use]
    pub fn local_path(&self) -> PathBuf {
        protocol::local_path(&self.path)
    }

    /// Returns a new `FileInfo` whose marks are recomputed against the
    /// local file at `path`, if this host can reach it. If the path is not
    /// locally available, returns a clone of `self` unchanged.
    #[must_use]
    pub fn refresh(&self) -> Self {
        match protocol::available_local_path(&self.path) {
            Some(local) => match stamp_existing_file(&local) {
                Ok(marks) => Self {
                    marks,
                    ..self.clone()
                },
                Err(_) => self.clone(),
            },
            None => self.clone(),
        }
    }

    /// Returns a new `FileInfo` with `marks` replaced directly. Used by the
    /// synchronization engine after a successful copy.
    #[must_use]
    pub fn with_marks(&self, marks: FileMarks) -> Self {
        Self {
            marks,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            FileInfo::bare("", "/tmp/a").unwrap_err(),
            TableError::InvalidName(_)
        ));
    }

    #[test]
    fn rejects_whitespace_in_name() {
        assert!(matches!(
            FileInfo::bare("a b", "/tmp/a").unwrap_err(),
            TableError::InvalidName(_)
        ));
    }

    #[test]
    fn bare_is_always_sentinel_even_if_file_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f.txt");
        std::fs::write(&file, b"hi").expect("write");

        let info = FileInfo::bare("a", file.to_str().unwrap()).expect("bare");
        assert!(info.marks().is_sentinel());
    }

    #[test]
    fn from_name_and_path_stamps_real_marks_when_available() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f.txt");
        std::fs::write(&file, b"hello").expect("write");

        let info = FileInfo::from_name_and_path("a", file.to_str().unwrap()).expect("info");
        assert!(!info.marks().is_sentinel());
        assert_eq!(
            info.marks().fingerprint(),
            checksums::hash_file(&file).unwrap()
        );
    }

    #[test]
    fn from_name_and_path_is_bare_when_unavailable() {
        let info = FileInfo::from_name_and_path("a", "/nonexistent/path/xyz").expect("info");
        assert!(info.marks().is_sentinel());
    }

    #[test]
    fn refresh_is_idempotent_for_untouched_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f.txt");
        std::fs::write(&file, b"hello").expect("write");

        let info = FileInfo::from_name_and_path("a", file.to_str().unwrap()).expect("info");
        let once = info.refresh();
        let twice = once.refresh();
        assert_eq!(once.marks(), twice.marks());
    }

    #[test]
    fn refresh_leaves_unavailable_entry_unchanged() {
        let info = FileInfo::bare("a", "user@otherhost:/tmp/f.txt").expect("bare");
        let refreshed = info.refresh();
        assert_eq!(info, refreshed);
    }

    #[test]
    fn local_path_strips_protocol_prefix() {
        let info = FileInfo::bare("a", "user@h:/tmp/f.txt").expect("bare");
        assert_eq!(info.local_path(), PathBuf::from("/tmp/f.txt"));
    }
}
