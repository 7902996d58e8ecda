//! Progress reporting hooks for long-running batch operations.

use std::path::Path;

/// Receives progress events from compress and extract operations.
///
/// Events arrive in order for every entry: `on_entry_start`, then
/// `on_bytes_written` with the entry's byte count, then
/// `on_entry_complete`. `on_complete` fires once after the last entry of a
/// successful operation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::ProgressCallback;
///
/// struct Counter(u64);
///
/// impl ProgressCallback for Counter {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, bytes: u64) {
///         self.0 += bytes;
///     }
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry is processed. `current` is 1-based.
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called with the number of bytes moved for the current entry.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after an entry was processed successfully.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once when the whole operation has finished.
    fn on_complete(&mut self);
}

/// Progress callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

/// Records every event; used by tests across the crate.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingProgress {
    pub started: Vec<(String, usize, usize)>,
    pub bytes: u64,
    pub completed: Vec<String>,
    pub finished: usize,
}

#[cfg(test)]
impl ProgressCallback for RecordingProgress {
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
        self.started
            .push((path.display().to_string(), total, current));
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes += bytes;
    }

    fn on_entry_complete(&mut self, path: &Path) {
        self.completed.push(path.display().to_string());
    }

    fn on_complete(&mut self) {
        self.finished += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_progress_accepts_events() {
        let mut progress = NoopProgress;
        progress.on_entry_start(Path::new("a.txt"), 1, 1);
        progress.on_bytes_written(10);
        progress.on_entry_complete(Path::new("a.txt"));
        progress.on_complete();
    }

    #[test]
    fn test_recording_progress() {
        let mut progress = RecordingProgress::default();
        progress.on_entry_start(Path::new("a.txt"), 2, 1);
        progress.on_bytes_written(10);
        progress.on_entry_complete(Path::new("a.txt"));
        progress.on_complete();

        assert_eq!(progress.started, vec![("a.txt".to_string(), 2, 1)]);
        assert_eq!(progress.bytes, 10);
        assert_eq!(progress.completed, vec!["a.txt".to_string()]);
        assert_eq!(progress.finished, 1);
    }
}
