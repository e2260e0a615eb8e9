//! Error types for drop operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Errors that can occur while copying, moving or linking a dropped item.
#[derive(Debug, Error)]
pub enum DropError {
    /// Source is neither a file nor a directory.
    #[error("Source not found: {path}")]
    NotFound { path: PathBuf },

    /// Destination exists and overwriting was disabled.
    #[error("Destination already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Optional shortcut metadata could not be applied.
    #[error("Shortcut metadata rejected for {path}: {message}")]
    PlatformLink { path: PathBuf, message: String },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination lies inside the source directory.
    #[error("Cannot copy or move {path} into itself ({destination})")]
    SourceIsAncestor { path: PathBuf, destination: PathBuf },

    /// Path has no usable file name or is otherwise malformed.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Operation was cancelled.
    #[error("Operation cancelled")]
    Cancelled,
}

impl DropError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an already exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the serializable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::PlatformLink { .. } => ErrorKind::PlatformLinkFailure,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::SourceIsAncestor { .. } => ErrorKind::SourceIsAncestor,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Discriminant of a [`DropError`], kept in outcomes and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[strum(to_string = "not found")]
    NotFound,
    #[strum(to_string = "already exists")]
    AlreadyExists,
    #[strum(to_string = "platform link failure")]
    PlatformLinkFailure,
    #[strum(to_string = "I/O failure")]
    IoFailure,
    #[strum(to_string = "source is ancestor")]
    SourceIsAncestor,
    #[strum(to_string = "invalid path")]
    InvalidPath,
    #[strum(to_string = "cancelled")]
    Cancelled,
}
