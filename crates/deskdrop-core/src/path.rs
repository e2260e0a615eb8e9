//! Path validation helpers.

use std::path::{Component, Path, PathBuf};

use crate::FileSystemEntry;

/// Check if a path resolves to an existing file or directory.
///
/// An empty path is never an error, it simply does not exist.
pub fn exists(path: impl AsRef<Path>) -> bool {
    FileSystemEntry::new(path.as_ref()).exists()
}

/// Check if two paths name the same location.
///
/// Both sides are normalized with [`normalize`] and compared ignoring case.
/// Returns `false` when either side is empty.
pub fn paths_equal(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.as_os_str().is_empty() || b.as_os_str().is_empty() {
        return false;
    }

    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => fold(&a) == fold(&b),
        _ => false,
    }
}

/// Lexically normalize a path to absolute form.
///
/// Relative paths are resolved against the current directory. Backslashes
/// count as separators on every platform, `.` segments are dropped and `..`
/// pops the previous segment. The filesystem is never consulted, so the path
/// does not need to exist. Returns `None` for an empty path or when the
/// current directory cannot be determined.
pub fn normalize(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return None;
    }

    let unified = PathBuf::from(path.to_string_lossy().replace('\\', "/"));
    let absolute = if unified.is_absolute() {
        unified
    } else {
        std::env::current_dir().ok()?.join(unified)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Some(normalized)
}

fn fold(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
