//! Compression operation reporting.

use std::time::Duration;

/// Report of a compression operation.
///
/// # Examples
///
/// ```
/// use ziptree_core::CompressReport;
///
/// let mut report = CompressReport::default();
/// report.files_added = 10;
/// report.bytes_written = 1024;
/// report.bytes_compressed = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// assert_eq!(report.compression_percentage(), 50.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompressReport {
    /// Number of files added to the archive.
    pub files_added: usize,

    /// Names of the entries added, in archive order.
    pub entries: Vec<String>,

    /// Total bytes read from source files (uncompressed).
    pub bytes_written: u64,

    /// Size of the finished archive file in bytes.
    ///
    /// Stays 0 when the archive was written to a caller-owned handle.
    pub bytes_compressed: u64,

    /// Duration of the operation.
    pub duration: Duration,

    /// Number of entries skipped (symlinks, the archive itself).
    pub files_skipped: usize,

    /// Warnings generated while compressing.
    pub warnings: Vec<String>,
}

impl CompressReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// Returns the space saved as a percentage of the uncompressed size.
    ///
    /// Returns 0.0 if nothing was written and never goes negative when the
    /// archive is larger than its input.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        let saved = self.bytes_written.saturating_sub(self.bytes_compressed);
        (saved as f64 / self.bytes_written as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_report_default() {
        let report = CompressReport::default();
        assert_eq!(report.files_added, 0);
        assert!(report.entries.is_empty());
        assert_eq!(report.bytes_written, 0);
        assert_eq!(report.bytes_compressed, 0);
        assert_eq!(report.duration, Duration::default());
        assert_eq!(report.files_skipped, 0);
        assert!(!report.has_warnings());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_ratio() {
        let mut report = CompressReport::new();

        report.bytes_written = 1000;
        report.bytes_compressed = 500;
        assert_eq!(report.compression_ratio(), 2.0);

        report.bytes_compressed = 0;
        assert_eq!(report.compression_ratio(), 0.0);

        report.bytes_written = 0;
        report.bytes_compressed = 500;
        assert_eq!(report.compression_ratio(), 0.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_percentage() {
        let mut report = CompressReport::new();

        report.bytes_written = 1000;
        report.bytes_compressed = 250;
        assert_eq!(report.compression_percentage(), 75.0);

        // Small inputs grow once headers are added
        report.bytes_written = 10;
        report.bytes_compressed = 120;
        assert_eq!(report.compression_percentage(), 0.0);

        report.bytes_written = 0;
        assert_eq!(report.compression_percentage(), 0.0);
    }
}
