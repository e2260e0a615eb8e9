//! Drop engine for deskdrop.
//!
//! This crate executes what a drop target asks for: copying or moving
//! dropped files and directories, creating shortcuts to them, and folding a
//! whole drop batch into per-item outcomes. Single-item operations return
//! their errors untouched; only the batch processor turns them into
//! [`deskdrop_core::OutcomeStatus::Failed`] and keeps going.

mod batch;
mod executor;
mod operation;
mod progress;
mod shortcut;
mod transfer;

pub use batch::{process_dropped_paths, DropProcessor};
pub use executor::{start_drop, DropEvent};
pub use operation::{DropOperation, ShortcutRequest, TransferRequest};
pub use progress::DropProgress;
pub use shortcut::{
    create_shortcut, is_internet_shortcut, platform_backend, CreatedShortcut, DescriptionStatus,
    DesktopEntryBackend, ShortcutBackend, ShortcutLink, INTERNET_SHORTCUT_EXTENSION,
};
#[cfg(windows)]
pub use shortcut::ShellLinkBackend;
pub use transfer::{copy_item, move_item, CopyOptions, CopyStats};

/// Default channel buffer size for drop progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
