//! Drop guards that remove partial output when an operation fails.

use std::path::Path;
use std::path::PathBuf;

/// Removes an archive file on drop unless [`commit`](Self::commit) was
/// called.
#[derive(Debug)]
pub(crate) struct OutputGuard {
    path: PathBuf,
    armed: bool,
}

impl OutputGuard {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    /// Keeps the file.
    pub(crate) fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.armed {
            remove_file(&self.path);
        }
    }
}

/// Tracks files written by a batch extraction.
///
/// Every tracked file is removed on drop unless the list is taken with
/// [`into_paths`](Self::into_paths). Directories are never removed.
#[derive(Debug, Default)]
pub(crate) struct ExtractedFiles {
    paths: Vec<PathBuf>,
}

impl ExtractedFiles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Commits the extraction and returns the paths in extraction order.
    pub(crate) fn into_paths(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

impl Drop for ExtractedFiles {
    fn drop(&mut self) {
        if !self.paths.is_empty() {
            log::debug!("removing {} extracted files", self.paths.len());
        }
        for path in &self.paths {
            // Directory markers are tracked too; only files are removed.
            if path.is_file() {
                remove_file(path);
            }
        }
    }
}

fn remove_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("failed to remove {}: {e}", path.display()),
    }
}
