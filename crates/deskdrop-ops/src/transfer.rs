//! Copy and move of a single file or directory.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use deskdrop_core::{normalize, DropError, EntryKind, FileSystemEntry};
use tokio_util::sync::CancellationToken;

/// Options for copy operations.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Replace files that already exist at the destination.
    pub overwrite: bool,
    /// Checked before every file copy; a fired token stops the copy.
    pub cancel: Option<CancellationToken>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            cancel: None,
        }
    }
}

impl CopyOptions {
    /// Create options with overwrite enabled and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overwrite policy.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancelled(&self) -> Result<(), DropError> {
        match self.cancel {
            Some(ref token) if token.is_cancelled() => Err(DropError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// What a successful copy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files written.
    pub files: usize,
    /// Directories created (or found already present).
    pub directories: usize,
    /// Bytes written.
    pub bytes: u64,
}

/// Copy a file or directory to `destination`.
///
/// Directories are copied depth-first with their full relative structure;
/// the destination directory itself may already exist. Fails with
/// [`DropError::NotFound`] when `source` is neither a file nor a directory.
/// The source is never modified. Files copied before a failure or
/// cancellation stay in place.
pub fn copy_item(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
) -> Result<CopyStats, DropError> {
    match FileSystemEntry::new(source).kind() {
        Some(EntryKind::Directory) => copy_dir(source, destination, options),
        Some(EntryKind::File) => {
            reject_same_path(source, destination)?;
            options.check_cancelled()?;
            let bytes = copy_file(source, destination, options.overwrite)?;
            Ok(CopyStats {
                files: 1,
                directories: 0,
                bytes,
            })
        }
        None => Err(DropError::not_found(source)),
    }
}

/// Move a file or directory to `destination` with a native rename.
///
/// There is no copy-and-delete fallback: moving across volumes or
/// filesystems fails with [`DropError::Io`]. With `overwrite` disabled an
/// existing destination fails with [`DropError::AlreadyExists`]; otherwise
/// the platform's rename semantics decide whether it is replaced.
pub fn move_item(source: &Path, destination: &Path, overwrite: bool) -> Result<(), DropError> {
    let kind = FileSystemEntry::new(source)
        .kind()
        .ok_or_else(|| DropError::not_found(source))?;

    let same = normalize(source) == normalize(destination);
    if kind == EntryKind::Directory && !same && is_inside(destination, source) {
        return Err(DropError::SourceIsAncestor {
            path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    if !overwrite && !same && fs::symlink_metadata(destination).is_ok() {
        return Err(DropError::already_exists(destination));
    }

    fs::rename(source, destination).map_err(|e| DropError::io(source, e))?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        kind = %kind,
        "moved"
    );
    Ok(())
}

/// A directory waiting in the copy worklist.
struct PendingDir {
    source: PathBuf,
    destination: PathBuf,
    /// Resolved paths of this directory and every directory above it.
    chain: Vec<PathBuf>,
}

/// Copy a directory tree using an explicit worklist.
///
/// Symlinked directories are followed unless they lead back to a directory
/// already on the current branch; such links are skipped.
fn copy_dir(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
) -> Result<CopyStats, DropError> {
    if is_inside(destination, source) {
        return Err(DropError::SourceIsAncestor {
            path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    let root = fs::canonicalize(source).map_err(|e| DropError::io(source, e))?;
    let mut stats = CopyStats::default();
    let mut pending = vec![PendingDir {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        chain: vec![root],
    }];

    while let Some(dir) = pending.pop() {
        let PendingDir {
            source: src_dir,
            destination: dst_dir,
            chain,
        } = dir;
        fs::create_dir_all(&dst_dir).map_err(|e| DropError::io(&dst_dir, e))?;
        stats.directories += 1;

        let entries = fs::read_dir(&src_dir).map_err(|e| DropError::io(&src_dir, e))?;
        let mut subdirs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DropError::io(&src_dir, e))?;
            let path = entry.path();
            let target = dst_dir.join(entry.file_name());
            let file_type = entry.file_type().map_err(|e| DropError::io(&path, e))?;

            let resolved = if file_type.is_dir() {
                chain.last().map(|parent| parent.join(entry.file_name()))
            } else if file_type.is_symlink() && path.is_dir() {
                Some(fs::canonicalize(&path).map_err(|e| DropError::io(&path, e))?)
            } else {
                None
            };

            if let Some(resolved) = resolved {
                // Link back into the current branch
                if chain.contains(&resolved) {
                    tracing::warn!(
                        link = %path.display(),
                        target = %resolved.display(),
                        "skipping symlink cycle"
                    );
                    continue;
                }
                let mut sub_chain = chain.clone();
                sub_chain.push(resolved);
                subdirs.push(PendingDir {
                    source: path,
                    destination: target,
                    chain: sub_chain,
                });
                continue;
            }

            options.check_cancelled()?;
            stats.bytes += copy_file(&path, &target, options.overwrite)?;
            stats.files += 1;
        }

        // Reversed so the stack pops subdirectories in listing order
        pending.extend(subdirs.into_iter().rev());
    }

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = stats.files,
        directories = stats.directories,
        "copied directory"
    );
    Ok(stats)
}

/// Copy a single file, returning the number of bytes written.
fn copy_file(source: &Path, dest: &Path, overwrite: bool) -> Result<u64, DropError> {
    if !overwrite && fs::symlink_metadata(dest).is_ok() {
        return Err(DropError::already_exists(dest));
    }

    let bytes = fs::copy(source, dest).map_err(|e| DropError::io(source, e))?;
    tracing::trace!(source = %source.display(), destination = %dest.display(), bytes, "copied file");
    Ok(bytes)
}

/// `fs::copy` onto the source itself would truncate it.
///
/// Besides equal paths this catches hard links, symlinks and differently
/// cased spellings of the source on case-insensitive volumes.
fn reject_same_path(source: &Path, destination: &Path) -> Result<(), DropError> {
    if normalize(source) == normalize(destination) || same_file(source, destination) {
        return Err(DropError::invalid_path(
            destination,
            "source and destination are the same file",
        ));
    }
    Ok(())
}

/// Check if both paths exist and resolve to the same file.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check if `path` is `ancestor` or lies beneath it.
fn is_inside(path: &Path, ancestor: &Path) -> bool {
    match (normalize(path), normalize(ancestor)) {
        (Some(path), Some(ancestor)) => path.starts_with(ancestor),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_options_default_overwrites() {
        let options = CopyOptions::default();
        assert!(options.overwrite);
        assert!(options.cancel.is_none());
        assert!(!CopyOptions::new().with_overwrite(false).overwrite);
    }

    #[test]
    fn test_is_inside() {
        assert!(is_inside(Path::new("/a/b/c"), Path::new("/a/b")));
        assert!(is_inside(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!is_inside(Path::new("/a/bc"), Path::new("/a/b")));
        assert!(!is_inside(Path::new("/a"), Path::new("/a/b")));
    }

    #[test]
    fn test_cancelled_token_is_reported() {
        let token = CancellationToken::new();
        let options = CopyOptions::new().with_cancellation(token.clone());
        assert!(options.check_cancelled().is_ok());
        token.cancel();
        assert!(matches!(options.check_cancelled(), Err(DropError::Cancelled)));
    }
}
