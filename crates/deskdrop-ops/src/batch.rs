//! Batch processing of dropped paths.

use std::path::{Path, PathBuf};

use deskdrop_core::{
    paths_equal, BatchResult, DropError, DropRequest, ItemOutcome, OutcomeStatus, TransferMode,
};
use tokio_util::sync::CancellationToken;

use crate::operation::{DropOperation, ShortcutRequest, TransferRequest};
use crate::shortcut::{platform_backend, ShortcutBackend};

/// Runs drop batches against a shortcut backend.
///
/// Every item is handled on its own: a failure is recorded in the item's
/// outcome and the batch moves on. Nothing here ever returns an error.
pub struct DropProcessor {
    shortcuts: Box<dyn ShortcutBackend>,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for DropProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropProcessor")
            .field("shortcut_extension", &self.shortcuts.extension())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Default for DropProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DropProcessor {
    /// Create a processor using the platform's shortcut backend.
    pub fn new() -> Self {
        Self {
            shortcuts: platform_backend(),
            cancel: None,
        }
    }

    /// Use a specific shortcut backend.
    pub fn with_backend(mut self, backend: impl ShortcutBackend + 'static) -> Self {
        self.shortcuts = Box::new(backend);
        self
    }

    /// Stop the batch (and any directory copy in flight) when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The shortcut backend in use.
    pub fn backend(&self) -> &dyn ShortcutBackend {
        self.shortcuts.as_ref()
    }

    /// Process every dropped path of `request`.
    pub fn process(&self, request: &DropRequest) -> BatchResult {
        self.process_with(request, |_| {})
    }

    /// Process every dropped path, calling `on_item` after each outcome.
    pub fn process_with(
        &self,
        request: &DropRequest,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> BatchResult {
        let mode = (!request.as_shortcuts).then_some(request.mode);
        let mut result = BatchResult::new(mode);
        let folder = request.destination_folder();

        for source in &request.paths {
            let outcome = self.process_item(request, folder, source);
            log_outcome(&outcome, request.as_shortcuts, request.mode);
            on_item(&outcome);
            result.push(outcome);
        }

        tracing::info!(
            folder = %folder.display(),
            succeeded = result.succeeded_count(),
            skipped = result.skipped_count(),
            failed = result.failed_count(),
            "{}",
            result.summary()
        );
        result
    }

    fn process_item(&self, request: &DropRequest, folder: &Path, source: &Path) -> ItemOutcome {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return ItemOutcome::failed(source, None, DropError::Cancelled);
        }

        let Some(name) = source.file_name() else {
            return ItemOutcome::failed(
                source,
                None,
                DropError::invalid_path(source, "path has no file name"),
            );
        };
        let destination = folder.join(name);

        if !request.as_shortcuts && source.parent().is_some_and(|p| paths_equal(p, folder)) {
            return ItemOutcome::skipped(source, destination);
        }

        let operation = if request.as_shortcuts {
            DropOperation::Shortcut(
                ShortcutRequest::new(source.to_path_buf())
                    .in_folder(folder.to_path_buf())
                    .with_overwrite(request.overwrite),
            )
        } else {
            DropOperation::Transfer(
                TransferRequest::new(source.to_path_buf(), destination.clone(), request.mode)
                    .with_overwrite(request.overwrite),
            )
        };

        match operation.execute(self.shortcuts.as_ref(), self.cancel.as_ref()) {
            Ok(written) => ItemOutcome::succeeded(source, written),
            Err(e) => ItemOutcome::failed(source, Some(destination), &e),
        }
    }
}

fn log_outcome(outcome: &ItemOutcome, as_shortcuts: bool, mode: TransferMode) {
    let source = outcome.source.display();
    let destination = outcome
        .destination
        .as_deref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();

    match outcome.status {
        OutcomeStatus::Skipped => {
            tracing::debug!(%source, "skipping item already in destination folder");
        }
        OutcomeStatus::Succeeded if as_shortcuts => {
            tracing::debug!(%source, %destination, "created shortcut");
        }
        OutcomeStatus::Succeeded => {
            tracing::debug!(%source, %destination, %mode, "transferred");
        }
        OutcomeStatus::Failed(ref reason) => {
            tracing::warn!(%source, kind = %reason.kind, "error processing item: {}", reason.message);
        }
    }
}

/// Process a drop with the platform shortcut backend.
///
/// `subfolder` replaces `target_folder` as the destination when set.
/// The number of processed items is `succeeded_count()` of the result.
pub fn process_dropped_paths(
    paths: &[PathBuf],
    target_folder: &Path,
    is_copy: bool,
    subfolder: Option<&Path>,
    as_shortcuts: bool,
) -> BatchResult {
    let request = DropRequest {
        paths: paths.to_vec(),
        target_folder: target_folder.to_path_buf(),
        mode: TransferMode::from_copy_flag(is_copy),
        subfolder: subfolder.map(Path::to_path_buf),
        as_shortcuts,
        overwrite: true,
    };
    DropProcessor::new().process(&request)
}
