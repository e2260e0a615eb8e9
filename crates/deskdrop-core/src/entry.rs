//! Filesystem entries resolved on demand.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of an existing filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory but exists).
    File,
    /// Directory.
    Directory,
}

/// A path whose kind is looked up only when asked for.
///
/// Nothing is cached: every call to [`FileSystemEntry::kind`] hits the
/// filesystem, so the answer reflects the state at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemEntry {
    path: PathBuf,
}

impl FileSystemEntry {
    /// Create an entry for a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the entry kind, following symlinks.
    ///
    /// Returns `None` when the path is empty or resolves to nothing.
    pub fn kind(&self) -> Option<EntryKind> {
        if self.path.as_os_str().is_empty() {
            return None;
        }
        let metadata = std::fs::metadata(&self.path).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else {
            Some(EntryKind::File)
        }
    }

    /// Check if the entry currently exists.
    pub fn exists(&self) -> bool {
        self.kind().is_some()
    }

    /// Check if the entry is currently a directory.
    pub fn is_dir(&self) -> bool {
        self.kind() == Some(EntryKind::Directory)
    }

    /// Check if the entry is currently a file.
    pub fn is_file(&self) -> bool {
        self.kind() == Some(EntryKind::File)
    }
}

impl From<PathBuf> for FileSystemEntry {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FileSystemEntry {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl AsRef<Path> for FileSystemEntry {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
