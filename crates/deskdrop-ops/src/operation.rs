//! Single-item drop operations.

use std::path::PathBuf;

use deskdrop_core::{DropError, TransferMode};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::shortcut::{create_shortcut, ShortcutBackend};
use crate::transfer::{copy_item, move_item, CopyOptions};

/// Copy or move one entry to an explicit destination path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: TransferMode,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl TransferRequest {
    /// Create a transfer request that overwrites existing destinations.
    pub fn new(source: PathBuf, destination: PathBuf, mode: TransferMode) -> Self {
        Self {
            source,
            destination,
            mode,
            overwrite: true,
        }
    }

    /// Set the overwrite policy.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Run the transfer. The token only affects directory copies.
    pub fn execute(&self, cancel: Option<&CancellationToken>) -> Result<(), DropError> {
        match self.mode {
            TransferMode::Copy => {
                let mut options = CopyOptions::new().with_overwrite(self.overwrite);
                options.cancel = cancel.cloned();
                copy_item(&self.source, &self.destination, &options).map(|_| ())
            }
            TransferMode::Move => move_item(&self.source, &self.destination, self.overwrite),
        }
    }
}

/// Create a shortcut to `target` inside `folder` (or next to the target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRequest {
    pub target: PathBuf,
    #[serde(default)]
    pub folder: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl ShortcutRequest {
    /// Create a shortcut request placed next to its target.
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            folder: None,
            overwrite: true,
        }
    }

    /// Place the shortcut in a specific folder.
    pub fn in_folder(mut self, folder: PathBuf) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Set the overwrite policy.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Create the shortcut, returning where it was written.
    pub fn execute(&self, backend: &dyn ShortcutBackend) -> Result<PathBuf, DropError> {
        create_shortcut(
            backend,
            &self.target,
            self.folder.as_deref(),
            self.overwrite,
        )
        .map(|created| created.path)
    }
}

fn default_true() -> bool {
    true
}

/// The work planned for one dropped item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOperation {
    Transfer(TransferRequest),
    Shortcut(ShortcutRequest),
}

impl DropOperation {
    /// Path of the dropped item this operation acts on.
    pub fn source(&self) -> &std::path::Path {
        match self {
            Self::Transfer(request) => &request.source,
            Self::Shortcut(request) => &request.target,
        }
    }

    /// Run the operation, returning the path that was written.
    pub fn execute(
        &self,
        backend: &dyn ShortcutBackend,
        cancel: Option<&CancellationToken>,
    ) -> Result<PathBuf, DropError> {
        match self {
            Self::Transfer(request) => request
                .execute(cancel)
                .map(|()| request.destination.clone()),
            Self::Shortcut(request) => request.execute(backend),
        }
    }
}
