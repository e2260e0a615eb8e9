//! Shortcut creation.
//!
//! Shortcuts are written by a [`ShortcutBackend`], one per platform. Internet
//! shortcuts (`.url`) are already plain-text redirects, so they are copied
//! verbatim instead of being wrapped in another shortcut.

mod desktop;
#[cfg(windows)]
mod shell_link;

use std::fs;
use std::path::{Path, PathBuf};

use deskdrop_core::{DropError, EntryKind, FileSystemEntry};

use crate::transfer::{copy_item, CopyOptions};

pub use desktop::DesktopEntryBackend;
#[cfg(windows)]
pub use shell_link::ShellLinkBackend;

/// Extension (without the dot) of internet shortcut files.
pub const INTERNET_SHORTCUT_EXTENSION: &str = "url";

/// Everything a backend needs to persist one shortcut.
#[derive(Debug, Clone, Copy)]
pub struct ShortcutLink<'a> {
    /// Path the shortcut resolves to.
    pub target: &'a Path,
    /// Where the shortcut file is written.
    pub path: &'a Path,
    /// Working directory recorded in the shortcut.
    pub working_dir: &'a Path,
    /// Optional human-readable description.
    pub description: Option<&'a str>,
}

/// What happened to the optional description of a shortcut.
///
/// Description metadata is best-effort: a backend that cannot store it still
/// writes the shortcut and reports the problem here instead of failing.
#[derive(Debug)]
pub enum DescriptionStatus {
    /// The description was stored.
    Applied,
    /// No description was supplied.
    NotRequested,
    /// The description was dropped; the shortcut itself was written.
    Ignored(DropError),
}

impl DescriptionStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A shortcut that was written to disk.
#[derive(Debug)]
pub struct CreatedShortcut {
    /// Path of the shortcut (or copied internet shortcut).
    pub path: PathBuf,
    /// Outcome of the best-effort description step.
    pub description: DescriptionStatus,
}

/// Platform capability for writing shortcut files.
pub trait ShortcutBackend: Send + Sync {
    /// File extension of shortcuts written by this backend, without the dot.
    fn extension(&self) -> &'static str;

    /// Write a shortcut at `link.path`, which is known not to exist.
    ///
    /// Only a failure to write the shortcut itself is an error; a rejected
    /// description comes back as [`DescriptionStatus::Ignored`].
    fn create(&self, link: &ShortcutLink<'_>) -> Result<DescriptionStatus, DropError>;
}

/// The native shortcut backend for the current platform.
///
/// Windows gets `.lnk` shell links; everything else gets freedesktop
/// `Type=Link` entries.
pub fn platform_backend() -> Box<dyn ShortcutBackend> {
    #[cfg(windows)]
    {
        Box::new(ShellLinkBackend::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(DesktopEntryBackend::new())
    }
}

/// Check if a path carries the internet shortcut extension (any case).
pub fn is_internet_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(INTERNET_SHORTCUT_EXTENSION))
}

/// Create a shortcut to `target` in `folder`, or next to the target.
///
/// Internet shortcuts are copied under their own file name. Everything else
/// gets `<stem>.<backend extension>`; with `overwrite` an existing shortcut at
/// that path is deleted first, otherwise it fails with
/// [`DropError::AlreadyExists`].
pub fn create_shortcut(
    backend: &dyn ShortcutBackend,
    target: &Path,
    folder: Option<&Path>,
    overwrite: bool,
) -> Result<CreatedShortcut, DropError> {
    let file_name = target
        .file_name()
        .ok_or_else(|| DropError::invalid_path(target, "path has no file name"))?;
    let parent = target.parent().unwrap_or(Path::new(""));
    let folder = folder
        .filter(|f| !f.as_os_str().is_empty())
        .unwrap_or(parent);

    let kind = FileSystemEntry::new(target)
        .kind()
        .ok_or_else(|| DropError::not_found(target))?;

    if kind == EntryKind::File && is_internet_shortcut(target) {
        let destination = folder.join(file_name);
        copy_item(
            target,
            &destination,
            &CopyOptions::new().with_overwrite(overwrite),
        )?;
        tracing::debug!(
            target = %target.display(),
            destination = %destination.display(),
            "copied internet shortcut"
        );
        return Ok(CreatedShortcut {
            path: destination,
            description: DescriptionStatus::NotRequested,
        });
    }

    let stem = target.file_stem().unwrap_or(file_name);
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(backend.extension());
    let path = folder.join(name);

    if fs::symlink_metadata(&path).is_ok() {
        if !overwrite {
            return Err(DropError::already_exists(&path));
        }
        fs::remove_file(&path).map_err(|e| DropError::io(&path, e))?;
    }

    let description = file_name.to_string_lossy();
    let status = backend.create(&ShortcutLink {
        target,
        path: &path,
        working_dir: parent,
        description: Some(&*description),
    })?;

    if let DescriptionStatus::Ignored(ref reason) = status {
        tracing::debug!(path = %path.display(), %reason, "shortcut description ignored");
    }
    tracing::debug!(target = %target.display(), shortcut = %path.display(), "created shortcut");

    Ok(CreatedShortcut {
        path,
        description: status,
    })
}
