use deskdrop_core::{DropError, DropRequest, ErrorKind, OutcomeStatus, TransferMode};
use deskdrop_ops::{
    copy_item, create_shortcut, move_item, process_dropped_paths, start_drop, CopyOptions,
    DescriptionStatus, DesktopEntryBackend, DropEvent, DropProcessor, ShortcutBackend,
    ShortcutLink, TransferRequest,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Build a small tree: root/{a.txt, sub/{b.txt, deep/c.bin}, empty/}
fn make_tree(root: &Path) {
    fs::create_dir_all(root.join("sub/deep")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("a.txt"), b"alpha").unwrap();
    fs::write(root.join("sub/b.txt"), b"bravo").unwrap();
    fs::write(root.join("sub/deep/c.bin"), [0u8, 1, 2, 3, 255]).unwrap();
}

/// Relative paths of every file and directory under `root`, sorted.
fn list_tree(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            found.push(path.strip_prefix(root).unwrap().to_path_buf());
            if path.is_dir() {
                pending.push(path);
            }
        }
    }
    found.sort();
    found
}

#[test]
fn test_copy_file_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.bin");
    let dest = temp.path().join("dest.bin");
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    fs::write(&source, &data).unwrap();

    let stats = copy_item(&source, &dest, &CopyOptions::default()).unwrap();

    assert_eq!(stats.files, 1);
    assert_eq!(stats.bytes, data.len() as u64);
    assert_eq!(fs::read(&dest).unwrap(), data);
    assert_eq!(fs::read(&source).unwrap(), data);
}

#[test]
fn test_copy_directory_preserves_structure() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    let dest = temp.path().join("copy");
    make_tree(&source);

    let stats = copy_item(&source, &dest, &CopyOptions::default()).unwrap();

    assert_eq!(stats.files, 3);
    assert_eq!(stats.directories, 4);
    assert_eq!(list_tree(&source), list_tree(&dest));
    for rel in ["a.txt", "sub/b.txt", "sub/deep/c.bin"] {
        assert_eq!(fs::read(source.join(rel)).unwrap(), fs::read(dest.join(rel)).unwrap());
    }
    assert!(source.join("sub/deep/c.bin").exists());
}

#[test]
fn test_copy_directory_into_existing_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    let dest = temp.path().join("copy");
    make_tree(&source);
    fs::create_dir_all(dest.join("sub")).unwrap();
    fs::write(dest.join("sub/b.txt"), b"old").unwrap();

    copy_item(&source, &dest, &CopyOptions::default()).unwrap();

    assert_eq!(fs::read(dest.join("sub/b.txt")).unwrap(), b"bravo");
}

#[test]
fn test_copy_without_overwrite_keeps_existing() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("new.txt");
    let dest = temp.path().join("old.txt");
    fs::write(&source, b"new").unwrap();
    fs::write(&dest, b"old").unwrap();

    let err = copy_item(&source, &dest, &CopyOptions::new().with_overwrite(false)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&dest).unwrap(), b"old");
}

#[test]
fn test_copy_missing_source() {
    let temp = TempDir::new().unwrap();
    let err = copy_item(
        &temp.path().join("missing"),
        &temp.path().join("dest"),
        &CopyOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, DropError::NotFound { .. }));
    assert!(!temp.path().join("dest").exists());
}

#[test]
fn test_copy_directory_into_itself() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    make_tree(&source);

    let err = copy_item(&source, &source.join("sub/inner"), &CopyOptions::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceIsAncestor);
    assert!(!source.join("sub/inner").exists());
}

#[test]
fn test_copy_file_onto_itself_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("same.txt");
    fs::write(&file, b"keep me").unwrap();

    let err = copy_item(&file, &file, &CopyOptions::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert_eq!(fs::read(&file).unwrap(), b"keep me");
}

#[test]
fn test_cancelled_directory_copy() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    make_tree(&source);
    let token = CancellationToken::new();
    token.cancel();

    let err = copy_item(
        &source,
        &temp.path().join("copy"),
        &CopyOptions::new().with_cancellation(token),
    )
    .unwrap_err();

    assert!(matches!(err, DropError::Cancelled));
    assert!(!temp.path().join("copy/a.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_copy_directory_skips_symlink_cycle() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    let dest = temp.path().join("copy");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), b"alpha").unwrap();
    std::os::unix::fs::symlink(&source, source.join("loop")).unwrap();

    let stats = copy_item(&source, &dest, &CopyOptions::default()).unwrap();

    assert_eq!(stats.files, 1);
    assert_eq!(stats.directories, 1);
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"alpha");
    assert!(fs::symlink_metadata(dest.join("loop")).is_err());
}

#[cfg(unix)]
#[test]
fn test_copy_directory_follows_symlink_outside_tree() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    let shared = temp.path().join("shared");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&shared).unwrap();
    fs::write(shared.join("s.txt"), b"shared").unwrap();
    std::os::unix::fs::symlink(&shared, source.join("linked")).unwrap();

    copy_item(&source, &temp.path().join("copy"), &CopyOptions::default()).unwrap();

    let copied = temp.path().join("copy/linked");
    assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
    assert_eq!(fs::read(copied.join("s.txt")).unwrap(), b"shared");
}

#[cfg(unix)]
#[test]
fn test_copy_file_onto_hard_link_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("same.txt");
    let link = temp.path().join("alias.txt");
    fs::write(&file, b"keep me").unwrap();
    fs::hard_link(&file, &link).unwrap();

    let err = copy_item(&file, &link, &CopyOptions::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert_eq!(fs::read(&file).unwrap(), b"keep me");
}

#[cfg(unix)]
#[test]
fn test_copy_file_onto_symlink_to_itself_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("same.txt");
    let link = temp.path().join("pointer.txt");
    fs::write(&file, b"keep me").unwrap();
    std::os::unix::fs::symlink(&file, &link).unwrap();

    let err = copy_item(&file, &link, &CopyOptions::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert_eq!(fs::read(&file).unwrap(), b"keep me");
}

#[test]
fn test_move_file() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("m.txt");
    let dest = temp.path().join("moved.txt");
    fs::write(&source, b"payload").unwrap();

    move_item(&source, &dest, true).unwrap();

    assert!(!source.exists());
    assert_eq!(fs::read(&dest).unwrap(), b"payload");
}

#[test]
fn test_move_directory() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("tree");
    let dest = temp.path().join("elsewhere");
    make_tree(&source);
    let before = list_tree(&source);

    move_item(&source, &dest, true).unwrap();

    assert!(!source.exists());
    assert_eq!(list_tree(&dest), before);
    assert_eq!(fs::read(dest.join("sub/deep/c.bin")).unwrap(), [0u8, 1, 2, 3, 255]);
}

#[test]
fn test_move_without_overwrite() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.txt");
    let dest = temp.path().join("b.txt");
    fs::write(&source, b"a").unwrap();
    fs::write(&dest, b"b").unwrap();

    let err = move_item(&source, &dest, false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(source.exists());
    assert_eq!(fs::read(&dest).unwrap(), b"b");
}

#[test]
fn test_move_errors() {
    let temp = TempDir::new().unwrap();
    let missing = move_item(&temp.path().join("nope"), &temp.path().join("x"), true).unwrap_err();
    assert!(matches!(missing, DropError::NotFound { .. }));

    let tree = temp.path().join("tree");
    make_tree(&tree);
    let nested = move_item(&tree, &tree.join("sub/tree"), true).unwrap_err();
    assert_eq!(nested.kind(), ErrorKind::SourceIsAncestor);
    assert!(tree.join("a.txt").exists());
}

#[test]
fn test_transfer_request_execute() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("t.txt");
    fs::write(&source, b"t").unwrap();

    let copy = TransferRequest::new(source.clone(), temp.path().join("c.txt"), TransferMode::Copy);
    assert!(copy.overwrite);
    copy.execute(None).unwrap();
    assert!(source.exists());

    let mv = TransferRequest::new(source.clone(), temp.path().join("m.txt"), TransferMode::Move);
    mv.execute(None).unwrap();
    assert!(!source.exists());
    assert!(temp.path().join("m.txt").exists());
}

#[test]
fn test_internet_shortcut_is_copied_verbatim() {
    let temp = TempDir::new().unwrap();
    let source_dir = temp.path().join("src");
    let folder = temp.path().join("desk");
    fs::create_dir_all(&source_dir).unwrap();
    fs::create_dir_all(&folder).unwrap();
    let contents = b"[InternetShortcut]\r\nURL=https://example.com/a?b=c\r\n";
    let url = source_dir.join("Example.URL");
    fs::write(&url, contents).unwrap();

    let created = create_shortcut(&DesktopEntryBackend::new(), &url, Some(&folder), true).unwrap();

    assert_eq!(created.path, folder.join("Example.URL"));
    assert!(matches!(created.description, DescriptionStatus::NotRequested));
    assert_eq!(fs::read(&created.path).unwrap(), contents);
    assert_eq!(fs::read(&url).unwrap(), contents);
}

#[test]
fn test_shortcut_defaults_to_target_folder() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("notes.md");
    fs::write(&target, b"# notes").unwrap();

    let created = create_shortcut(&DesktopEntryBackend::new(), &target, None, true).unwrap();

    assert_eq!(created.path, temp.path().join("notes.desktop"));
    assert!(created.description.is_applied());
    assert_eq!(DesktopEntryBackend::read_target(&created.path).unwrap(), target);
    let contents = fs::read_to_string(&created.path).unwrap();
    assert!(contents.contains("Comment=notes.md"));
    assert!(contents.contains(&format!("Path={}", temp.path().display())));
}

#[test]
fn test_shortcut_overwrite_points_at_latest_target() {
    let temp = TempDir::new().unwrap();
    let folder = temp.path().join("desk");
    let first_dir = temp.path().join("one");
    let second_dir = temp.path().join("two");
    for dir in [&folder, &first_dir, &second_dir] {
        fs::create_dir_all(dir).unwrap();
    }
    let first = first_dir.join("doc.txt");
    let second = second_dir.join("doc.pdf");
    fs::write(&first, b"1").unwrap();
    fs::write(&second, b"2").unwrap();
    let backend = DesktopEntryBackend::new();

    let a = create_shortcut(&backend, &first, Some(&folder), true).unwrap();
    let b = create_shortcut(&backend, &second, Some(&folder), true).unwrap();

    assert_eq!(a.path, b.path);
    assert_eq!(fs::read_dir(&folder).unwrap().count(), 1);
    assert_eq!(DesktopEntryBackend::read_target(&b.path).unwrap(), second);
}

#[test]
fn test_shortcut_without_overwrite() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("x.txt");
    fs::write(&target, b"x").unwrap();
    let backend = DesktopEntryBackend::new();

    create_shortcut(&backend, &target, None, false).unwrap();
    let err = create_shortcut(&backend, &target, None, false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

/// Backend that rejects every description, to check it stays non-fatal.
struct PickyBackend;

impl ShortcutBackend for PickyBackend {
    fn extension(&self) -> &'static str {
        "lnk"
    }

    fn create(&self, link: &ShortcutLink<'_>) -> Result<DescriptionStatus, DropError> {
        fs::write(link.path, link.target.to_string_lossy().as_bytes())
            .map_err(|e| DropError::io(link.path, e))?;
        Ok(DescriptionStatus::Ignored(DropError::PlatformLink {
            path: link.path.to_path_buf(),
            message: "description rejected".to_string(),
        }))
    }
}

#[test]
fn test_description_failure_still_creates_shortcut() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("app.exe");
    fs::write(&target, b"MZ").unwrap();

    let created = create_shortcut(&PickyBackend, &target, None, true).unwrap();

    assert_eq!(created.path, temp.path().join("app.lnk"));
    assert!(created.path.exists());
    assert!(matches!(
        created.description,
        DescriptionStatus::Ignored(ref e) if e.kind() == ErrorKind::PlatformLinkFailure
    ));
}

#[test]
fn test_batch_tolerates_missing_item() {
    let temp = TempDir::new().unwrap();
    let source_dir = temp.path().join("src");
    let target = temp.path().join("desk");
    fs::create_dir_all(&target).unwrap();
    make_tree(&source_dir);

    let paths = vec![
        source_dir.join("a.txt"),
        source_dir.join("ghost.txt"),
        source_dir.join("sub"),
    ];
    let result = process_dropped_paths(&paths, &target, true, None, false);

    assert_eq!(result.succeeded_count(), 2);
    assert_eq!(result.len(), 3);
    assert_eq!(result.outcomes[1].failure().unwrap().kind, ErrorKind::NotFound);
    assert!(target.join("a.txt").exists());
    assert!(target.join("sub/deep/c.bin").exists());
    assert_eq!(result.summary(), "Copied 2 items, 1 failed");
}

#[test]
fn test_batch_skips_same_folder_copy() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("here.txt");
    fs::write(&file, b"here").unwrap();
    let before = list_tree(temp.path());

    let upper = PathBuf::from(temp.path().to_string_lossy().to_uppercase());
    let request = DropRequest::new(vec![file.clone()], &upper, TransferMode::Copy);
    let result = DropProcessor::new()
        .with_backend(DesktopEntryBackend::new())
        .process(&request);

    assert_eq!(result.outcomes[0].status, OutcomeStatus::Skipped);
    assert_eq!(result.succeeded_count(), 0);
    assert_eq!(list_tree(temp.path()), before);
}

#[test]
fn test_batch_same_folder_move_is_skipped() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("stay.txt");
    fs::write(&file, b"stay").unwrap();

    let result = process_dropped_paths(&[file.clone()], temp.path(), false, None, false);

    assert_eq!(result.outcomes[0].status, OutcomeStatus::Skipped);
    assert!(file.exists());
}

#[test]
fn test_batch_move_with_subfolder_override() {
    let temp = TempDir::new().unwrap();
    let desk = temp.path().join("desk");
    let inner = desk.join("inner");
    fs::create_dir_all(&inner).unwrap();
    let file = temp.path().join("go.txt");
    fs::write(&file, b"go").unwrap();

    let request = DropRequest::builder()
        .target_folder(&desk)
        .path(&file)
        .mode(TransferMode::Move)
        .subfolder(inner.clone())
        .build()
        .unwrap();
    let result = DropProcessor::new().process(&request);

    assert_eq!(result.succeeded_count(), 1);
    assert_eq!(result.outcomes[0].destination.as_deref(), Some(inner.join("go.txt").as_path()));
    assert!(!file.exists());
    assert!(inner.join("go.txt").exists());
    assert!(!desk.join("go.txt").exists());
}

#[test]
fn test_batch_shortcuts_are_created_in_place() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("self.txt");
    fs::write(&file, b"self").unwrap();

    let mut request = DropRequest::new(vec![file.clone()], temp.path(), TransferMode::Copy);
    request.as_shortcuts = true;
    let result = DropProcessor::new()
        .with_backend(DesktopEntryBackend::new())
        .process(&request);

    assert_eq!(result.succeeded_count(), 1);
    assert_eq!(result.mode, None);
    let shortcut = temp.path().join("self.desktop");
    assert_eq!(result.outcomes[0].destination.as_deref(), Some(shortcut.as_path()));
    assert_eq!(DesktopEntryBackend::read_target(&shortcut).unwrap(), file);
}

#[test]
fn test_batch_after_cancellation() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("desk");
    fs::create_dir_all(&target).unwrap();
    let file = temp.path().join("f.txt");
    fs::write(&file, b"f").unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let request = DropRequest::new(vec![file.clone(), file], &target, TransferMode::Copy);
    let result = DropProcessor::new()
        .with_cancellation(token)
        .process(&request);

    assert_eq!(result.failed_count(), 2);
    assert!(result.failures().all(|(_, r)| r.kind == ErrorKind::Cancelled));
    assert!(!target.join("f.txt").exists());
}

#[test]
fn test_batch_cancelled_between_items() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("desk");
    fs::create_dir_all(&target).unwrap();
    let first = temp.path().join("first.txt");
    let second = temp.path().join("second.txt");
    fs::write(&first, b"one").unwrap();
    fs::write(&second, b"two").unwrap();
    let token = CancellationToken::new();

    let request = DropRequest::new(
        vec![first.clone(), second.clone()],
        &target,
        TransferMode::Copy,
    );
    let result = DropProcessor::new()
        .with_cancellation(token.clone())
        .process_with(&request, |_| token.cancel());

    assert_eq!(result.len(), 2);
    assert!(result.outcomes[0].is_succeeded());
    assert_eq!(fs::read(target.join("first.txt")).unwrap(), b"one");
    assert_eq!(result.outcomes[1].failure().unwrap().kind, ErrorKind::Cancelled);
    assert!(!target.join("second.txt").exists());
    assert!(second.exists());
    assert_eq!(result.succeeded_count(), 1);
}

#[test]
fn test_batch_rejects_path_without_name() {
    let temp = TempDir::new().unwrap();
    let result = process_dropped_paths(&[PathBuf::from("/")], temp.path(), true, None, false);
    assert_eq!(result.outcomes[0].failure().unwrap().kind, ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_start_drop_streams_progress() {
    let temp = TempDir::new().unwrap();
    let source_dir = temp.path().join("src");
    let target = temp.path().join("desk");
    fs::create_dir_all(&target).unwrap();
    make_tree(&source_dir);

    let request = DropRequest::new(
        vec![source_dir.join("a.txt"), source_dir.join("missing"), source_dir.join("sub")],
        &target,
        TransferMode::Copy,
    );
    let mut rx = start_drop(Arc::new(DropProcessor::new()), request);

    let mut progress_events = 0;
    let mut complete = None;
    while let Some(event) = rx.recv().await {
        match event {
            DropEvent::Progress(progress) => {
                progress_events += 1;
                assert_eq!(progress.items_completed, progress_events);
                assert_eq!(progress.items_total, 3);
            }
            DropEvent::Complete(result) => complete = Some(result),
        }
    }

    assert_eq!(progress_events, 3);
    let result = complete.expect("complete event");
    assert_eq!(result.succeeded_count(), 2);
    assert_eq!(result.failed_count(), 1);
}

#[tokio::test]
async fn test_start_drop_empty_batch() {
    let temp = TempDir::new().unwrap();
    let request = DropRequest::new(vec![], temp.path(), TransferMode::Move);
    let mut rx = start_drop(Arc::new(DropProcessor::new()), request);

    match rx.recv().await {
        Some(DropEvent::Complete(result)) => assert!(result.is_empty()),
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(rx.recv().await.is_none());
}
