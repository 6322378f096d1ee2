// Directory walker used by both binaries.
// Hidden entries (leading '.') and `node_modules` are never entered or
// returned. The first unreadable entry fails the whole walk.

use crate::error::WalkError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names skipped in addition to dot-entries.
pub const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Image extensions the uploader picks up (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "heic"];

/// Extension of files the rewriter edits.
pub const MARKUP_EXTENSION: &str = "html";

/// Recursive file finder with a caller-supplied extension predicate.
pub struct Walker {
    root: PathBuf,
    max_depth: Option<usize>,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Walker {
            root: root.into(),
            max_depth: None,
        }
    }

    /// Only look `depth` levels below the root. `1` lists a flat directory.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Every regular file under the root accepted by `matches`, in
    /// file-name order within each directory.
    pub fn files<F>(&self, matches: F) -> Result<Vec<PathBuf>, WalkError>
    where
        F: Fn(&Path) -> bool,
    {
        let mut walk = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walk = walk.max_depth(depth);
        }

        let mut found = Vec::new();
        for entry in walk.into_iter().filter_entry(|e| e.depth() == 0 || !is_skipped(e)) {
            let entry = entry.map_err(|source| WalkError {
                root: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && matches(entry.path()) {
                found.push(entry.into_path());
            }
        }

        debug!(root = %self.root.display(), count = found.len(), "walk finished");
        Ok(found)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Case-insensitive match against [`IMAGE_EXTENSIONS`].
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Exact `.html` match.
pub fn is_markup(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == MARKUP_EXTENSION)
}
