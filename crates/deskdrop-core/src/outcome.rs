//! Per-item outcomes of a drop batch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DropError, ErrorKind, TransferMode};

/// Why an item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    /// Error kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl FailureReason {
    /// Create a new failure reason.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&DropError> for FailureReason {
    fn from(error: &DropError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

impl From<DropError> for FailureReason {
    fn from(error: DropError) -> Self {
        Self::from(&error)
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Terminal state of a single batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Item was left alone because it already sits in the destination folder.
    Skipped,
    /// Item was copied, moved or linked.
    Succeeded,
    /// Item failed; the batch carried on.
    Failed(FailureReason),
}

/// Outcome of one dropped path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// The dropped source path.
    pub source: PathBuf,
    /// Computed destination, if one could be derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// What happened.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ItemOutcome {
    /// Create a skipped outcome.
    pub fn skipped(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: Some(destination.into()),
            status: OutcomeStatus::Skipped,
        }
    }

    /// Create a succeeded outcome.
    pub fn succeeded(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: Some(destination.into()),
            status: OutcomeStatus::Succeeded,
        }
    }

    /// Create a failed outcome.
    pub fn failed(
        source: impl Into<PathBuf>,
        destination: Option<PathBuf>,
        reason: impl Into<FailureReason>,
    ) -> Self {
        Self {
            source: source.into(),
            destination,
            status: OutcomeStatus::Failed(reason.into()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }

    /// The failure reason, if the item failed.
    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            OutcomeStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Ordered outcomes of a whole drop batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// What the batch did (copy, move, or shortcuts when `None`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TransferMode>,
    /// One outcome per dropped path, in drop order.
    pub outcomes: Vec<ItemOutcome>,
    /// Derived count of succeeded items.
    pub succeeded: usize,
}

impl BatchResult {
    /// Create an empty result for a transfer mode (`None` for shortcuts).
    pub fn new(mode: Option<TransferMode>) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
            succeeded: 0,
        }
    }

    /// Append an outcome, keeping the succeeded count in step.
    pub fn push(&mut self, outcome: ItemOutcome) {
        if outcome.is_succeeded() {
            self.succeeded += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Number of items that were copied, moved or linked.
    ///
    /// This is the "processed count": skipped and failed items do not count.
    pub fn succeeded_count(&self) -> usize {
        self.succeeded
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Iterate over failed items with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FailureReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure().map(|reason| (o.source.as_path(), reason)))
    }

    /// Check if no item failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Total number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Get a human-readable summary of the batch.
    pub fn summary(&self) -> String {
        let action = match self.mode {
            Some(TransferMode::Copy) => "Copied",
            Some(TransferMode::Move) => "Moved",
            None => "Linked",
        };

        let mut summary = format!("{} {} items", action, self.succeeded);
        let skipped = self.skipped_count();
        if skipped > 0 {
            summary.push_str(&format!(", {} skipped", skipped));
        }
        let failed = self.failed_count();
        if failed > 0 {
            summary.push_str(&format!(", {} failed", failed));
        }
        summary
    }
}

impl FromIterator<ItemOutcome> for BatchResult {
    fn from_iter<T: IntoIterator<Item = ItemOutcome>>(iter: T) -> Self {
        let mut result = Self::default();
        for outcome in iter {
            result.push(outcome);
        }
        result
    }
}
