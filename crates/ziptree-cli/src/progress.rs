//! Progress bar for compress and extract runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use std::path::Path;
use ziptree_core::ProgressCallback;

/// Progress bar driven by `ProgressCallback` events.
///
/// The bar length is taken from the first `on_entry_start` event, so it can
/// be created before the number of entries is known. Cleared on drop.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_written: u64,
}

impl CliProgress {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // "Compressing [████░░░░] 42/100 files (15.2 MB, 12s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files ({prefix}, {elapsed_short})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key(
                    "elapsed_short",
                    |state: &ProgressState, w: &mut dyn Write| {
                        write!(w, "{}", humanize_duration(state.elapsed())).unwrap_or(());
                    },
                )
                .progress_chars("█▓░"),
        );

        bar.set_message(message.to_string());
        bar.set_prefix(humanize_bytes(0));

        Self {
            bar,
            bytes_written: 0,
        }
    }

    /// Returns true when stdout is a terminal.
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, _path: &Path, total: usize, _current: usize) {
        let total = total as u64;
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.bar.set_prefix(humanize_bytes(self.bytes_written));
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(Duration::from_secs(5)), "5s");
        assert_eq!(humanize_duration(Duration::from_secs(125)), "2m5s");
    }

    #[test]
    fn test_length_follows_first_event() {
        let mut progress = CliProgress::new("Compressing");

        progress.on_entry_start(Path::new("a.txt"), 3, 1);
        progress.on_bytes_written(2048);
        progress.on_entry_complete(Path::new("a.txt"));
        progress.on_entry_start(Path::new("b.txt"), 3, 2);
        progress.on_bytes_written(1024);
        progress.on_entry_complete(Path::new("b.txt"));

        assert_eq!(progress.bar.length(), Some(3));
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bytes_written, 3072);
    }
}
