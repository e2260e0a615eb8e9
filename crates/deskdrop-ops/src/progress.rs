//! Progress reporting for drop batches.

use deskdrop_core::ItemOutcome;

/// Progress of a running drop batch.
#[derive(Debug, Clone)]
pub struct DropProgress {
    /// Items with a final outcome.
    pub items_completed: usize,
    /// Items in the batch.
    pub items_total: usize,
    /// Items that succeeded so far.
    pub succeeded: usize,
    /// Items that failed so far.
    pub failed: usize,
    /// The most recently finished item.
    pub last: Option<ItemOutcome>,
}

impl DropProgress {
    /// Create a progress tracker for a batch.
    pub fn new(items_total: usize) -> Self {
        Self {
            items_completed: 0,
            items_total,
            succeeded: 0,
            failed: 0,
            last: None,
        }
    }

    /// Record a finished item.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.items_completed += 1;
        if outcome.is_succeeded() {
            self.succeeded += 1;
        } else if outcome.is_failed() {
            self.failed += 1;
        }
        self.last = Some(outcome.clone());
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.items_total > 0 {
            (self.items_completed as f64 / self.items_total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_finished(&self) -> bool {
        self.items_completed >= self.items_total
    }
}
