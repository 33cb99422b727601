//! [`Table`]: the ordered `name -> FileInfo` manifest and its persistence.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;

use crate::error::TableError;
use crate::format::{FileRecord, TableDocument};
use crate::info::FileInfo;

/// An ordered mapping from logical name to [`FileInfo`], plus an optional
/// free-form description.
///
/// Invariant: for every entry, `entry.name() == key`. Iteration order is by
/// sorted name; storage order is not semantically meaningful.
#[derive(Clone, Debug, Default)]
pub struct Table {
    description: String,
    files: BTreeMap<String, FileInfo>,
}

impl Table {
    /// Creates a new, empty table with the given description.
    #[must_use]
    pub fn create(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            files: BTreeMap::new(),
        }
    }

    /// Builds a table from a sequence of entries.
    #[must_use]
    pub fn from_files(files: impl IntoIterator<Item = FileInfo>, description: impl Into<String>) -> Self {
        let mut table = Self::create(description);
        for info in files {
            table.add(info);
        }
        table
    }

    /// The table's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Inserts `info`, replacing any existing entry with the same name.
    pub fn add(&mut self, info: FileInfo) {
        self.files.insert(info.name().to_string(), info);
    }

    /// Inserts `info`, failing with [`TableError::DuplicateName`] if an
    /// entry with that name already exists.
    pub fn add_new(&mut self, info: FileInfo) -> Result<(), TableError> {
        if self.files.contains_key(info.name()) {
            return Err(TableError::DuplicateName(info.name().to_string()));
        }
        self.add(info);
        Ok(())
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FileInfo> {
        self.files.get(name)
    }

    /// Returns all entries, sorted by name.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &FileInfo> {
        self.files.values()
    }

    /// Returns all entry names, sorted.
    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Removes entries whose name matches `pattern`. When `as_regex` is
    /// `false`, `pattern` must match a name exactly. Returns the number of
    /// entries removed.
    pub fn remove(&mut self, pattern: &str, as_regex: bool) -> Result<usize, TableError> {
        if !as_regex {
            return Ok(usize::from(self.files.remove(pattern).is_some()));
        }
        let re = Regex::new(pattern)
            .map_err(|err| TableError::InvalidPattern(pattern.to_string(), err.to_string()))?;
        let matching: Vec<String> = self
            .files
            .keys()
            .filter(|name| re.is_match(name))
            .cloned()
            .collect();
        let removed = matching.len();
        for name in matching {
            self.files.remove(&name);
        }
        Ok(removed)
    }

    /// Returns a new table whose entries are each refreshed against the
    /// local filesystem (see [`FileInfo::refresh`]).
    #[must_use]
    pub fn updated(&self) -> Self {
        Self {
            description: self.description.clone(),
            files: self
                .files
                .iter()
                .map(|(name, info)| (name.clone(), info.refresh()))
                .collect(),
        }
    }

    /// Replaces the entry named `name`, if present, keeping all other
    /// entries untouched. Used by the synchronization engine to apply a
    /// refreshed marks value after a successful copy.
    pub fn replace(&mut self, info: FileInfo) {
        self.files.insert(info.name().to_string(), info);
    }

    /// Loads a table from a local JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: TableDocument =
            serde_json::from_str(&contents).map_err(|err| TableError::Format {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        let mut files = BTreeMap::new();
        for record in document.files {
            let name = record.name.clone();
            let info = record.into_info()?;
            if files.insert(name.clone(), info).is_some() {
                return Err(TableError::Format {
                    path: path.display().to_string(),
                    reason: format!("duplicate entry name {name:?}"),
                });
            }
        }

        Ok(Self {
            description: document.description,
            files,
        })
    }

    /// Writes the table to a local JSON file as a whole-file replacement:
    /// the new content is written to a sibling temporary file, then
    /// renamed into place, so any concurrent reader observes either the
    /// old or the new table, never a torn one.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let document = TableDocument {
            description: self.description.clone(),
            files: self.files.values().map(FileRecord::from_info).collect(),
        };
        let serialized =
            serde_json::to_string_pretty(&document).map_err(|err| TableError::Format {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        std::io::Write::write_all(&mut tmp, serialized.as_bytes()).map_err(|source| {
            TableError::Io {
                path: path.display().to_string(),
                source,
            }
        })?;
        tmp.persist(path)
            .map_err(|err| TableError::Io {
                path: path.display().to_string(),
                source: err.error,
            })?;
        Ok(())
    }
}
