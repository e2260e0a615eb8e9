//! Running drop batches off the caller's thread.

use std::sync::Arc;

use deskdrop_core::{BatchResult, DropRequest};
use tokio::sync::mpsc;

use crate::batch::DropProcessor;
use crate::progress::DropProgress;
use crate::OPERATION_CHANNEL_SIZE;

/// Event sent through the channel while a batch runs.
#[derive(Debug)]
pub enum DropEvent {
    /// An item finished.
    Progress(DropProgress),
    /// The batch finished. Always the last event.
    Complete(BatchResult),
}

/// Start a drop batch on the blocking thread pool.
///
/// Returns a receiver that yields one progress event per item followed by
/// the complete result. Dropping the receiver does not stop the batch; use
/// the processor's cancellation token for that.
pub fn start_drop(processor: Arc<DropProcessor>, request: DropRequest) -> mpsc::Receiver<DropEvent> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::task::spawn_blocking(move || {
        let mut progress = DropProgress::new(request.paths.len());

        let result = processor.process_with(&request, |outcome| {
            progress.record(outcome);
            let _ = tx.blocking_send(DropEvent::Progress(progress.clone()));
        });

        let _ = tx.blocking_send(DropEvent::Complete(result));
    });

    rx
}
