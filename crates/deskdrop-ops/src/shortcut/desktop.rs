//! Plain-text shortcuts as freedesktop `Type=Link` entries.

use std::fs;
use std::path::{Path, PathBuf};

use deskdrop_core::{normalize, DropError};
use url::Url;

use super::{DescriptionStatus, ShortcutBackend, ShortcutLink};

const GROUP_HEADER: &str = "[Desktop Entry]";

/// Writes `.desktop` link entries pointing at a `file://` URL.
///
/// Works on every platform since the result is an ordinary text file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopEntryBackend;

impl DesktopEntryBackend {
    pub fn new() -> Self {
        Self
    }

    /// Read back the target path of a link entry.
    pub fn read_target(path: &Path) -> Result<PathBuf, DropError> {
        let contents = fs::read_to_string(path).map_err(|e| DropError::io(path, e))?;

        contents
            .lines()
            .find_map(|line| line.strip_prefix("URL="))
            .and_then(|url| Url::parse(url.trim()).ok())
            .and_then(|url| url.to_file_path().ok())
            .ok_or_else(|| DropError::invalid_path(path, "not a desktop link entry"))
    }
}

impl ShortcutBackend for DesktopEntryBackend {
    fn extension(&self) -> &'static str {
        "desktop"
    }

    fn create(&self, link: &ShortcutLink<'_>) -> Result<DescriptionStatus, DropError> {
        let target = normalize(link.target)
            .ok_or_else(|| DropError::invalid_path(link.target, "empty target"))?;
        let url = Url::from_file_path(&target)
            .map_err(|()| DropError::invalid_path(&target, "cannot express target as a URL"))?;

        let name = link
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut entry = String::new();
        entry.push_str(GROUP_HEADER);
        entry.push('\n');
        entry.push_str("Version=1.0\n");
        entry.push_str("Type=Link\n");
        push_key(&mut entry, "Name", &escape_lossy(&name));
        push_key(&mut entry, "URL", url.as_str());

        if let Some(dir) = normalize(link.working_dir) {
            push_key(&mut entry, "Path", &escape_lossy(&dir.to_string_lossy()));
        }

        let status = match link.description {
            None => DescriptionStatus::NotRequested,
            Some(description) => match escape(description) {
                Some(comment) => {
                    push_key(&mut entry, "Comment", &comment);
                    DescriptionStatus::Applied
                }
                None => DescriptionStatus::Ignored(DropError::PlatformLink {
                    path: link.path.to_path_buf(),
                    message: "description contains control characters".to_string(),
                }),
            },
        };

        fs::write(link.path, entry).map_err(|e| DropError::io(link.path, e))?;
        Ok(status)
    }
}

fn push_key(entry: &mut String, key: &str, value: &str) {
    entry.push_str(key);
    entry.push('=');
    entry.push_str(value);
    entry.push('\n');
}

/// Escape a key-file string value.
///
/// Returns `None` for control characters the format has no escape for.
fn escape(value: &str) -> Option<String> {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            ' ' if i == 0 => escaped.push_str("\\s"),
            c if c.is_control() => return None,
            c => escaped.push(c),
        }
    }
    Some(escaped)
}

/// Like [`escape`], replacing unrepresentable characters instead of failing.
fn escape_lossy(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\n' | '\t' | '\r') {
                '?'
            } else {
                c
            }
        })
        .collect();
    escape(&cleaned).unwrap_or_default()
}
