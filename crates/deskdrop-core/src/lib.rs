//! Core types for deskdrop.
//!
//! This crate holds the vocabulary shared by the drop engine and its hosts:
//! the error type, lazily resolved filesystem entries, path validation,
//! drop requests and the per-item outcomes a batch produces.

mod entry;
mod error;
mod outcome;
mod path;
mod request;

pub use entry::{EntryKind, FileSystemEntry};
pub use error::{DropError, ErrorKind};
pub use outcome::{BatchResult, FailureReason, ItemOutcome, OutcomeStatus};
pub use path::{exists, normalize, paths_equal};
pub use request::{DropRequest, DropRequestBuilder, TransferMode};
