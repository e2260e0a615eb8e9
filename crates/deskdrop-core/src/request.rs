//! Drop request types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Whether dropped items are copied or moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    /// Pick the mode from a copy flag.
    pub fn from_copy_flag(is_copy: bool) -> Self {
        if is_copy { Self::Copy } else { Self::Move }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Self::Copy)
    }
}

/// Everything a host hands over when items are dropped on a target folder.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DropRequest {
    /// Dropped source paths, in drop order.
    #[builder(default)]
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Folder the items were dropped on.
    pub target_folder: PathBuf,

    /// Copy or move.
    #[builder(default)]
    #[serde(default)]
    pub mode: TransferMode,

    /// Subfolder of the target that received the drop, if any.
    #[builder(default)]
    #[serde(default)]
    pub subfolder: Option<PathBuf>,

    /// Create shortcuts instead of copying or moving.
    #[builder(default = "false")]
    #[serde(default)]
    pub as_shortcuts: bool,

    /// Replace existing destinations.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

fn default_true() -> bool {
    true
}

impl DropRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.target_folder {
            Some(ref folder) if folder.as_os_str().is_empty() => {
                Err("Target folder cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Target folder is required".to_string()),
        }
    }

    /// Append a single dropped path.
    pub fn path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.paths.get_or_insert_with(Vec::new).push(path.into());
        self
    }
}

impl DropRequest {
    /// Create a new drop request builder.
    pub fn builder() -> DropRequestBuilder {
        DropRequestBuilder::default()
    }

    /// Create a copy/move request with default flags.
    pub fn new(paths: Vec<PathBuf>, target_folder: impl Into<PathBuf>, mode: TransferMode) -> Self {
        Self {
            paths,
            target_folder: target_folder.into(),
            mode,
            subfolder: None,
            as_shortcuts: false,
            overwrite: true,
        }
    }

    /// Folder that receives the items: the subfolder override when set,
    /// otherwise the target folder. An empty override counts as unset.
    pub fn destination_folder(&self) -> &Path {
        match self.subfolder {
            Some(ref sub) if !sub.as_os_str().is_empty() => sub,
            _ => &self.target_folder,
        }
    }
}
