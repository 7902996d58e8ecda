//! Configuration for archive compression.

use crate::Result;
use crate::ZipTreeError;

/// Configuration for compression operations.
///
/// Controls which filesystem entries are visited while walking a directory
/// and how each entry is stored.
///
/// # Examples
///
/// ```
/// use ziptree_core::CompressConfig;
///
/// // Plain defaults: no hidden files, deflate level 6
/// let config = CompressConfig::default();
///
/// let custom = CompressConfig::default()
///     .with_include_hidden(true)
///     .with_exclude_patterns(vec!["*.log".to_string()])
///     .with_compression_level(9);
/// ```
#[derive(Debug, Clone)]
pub struct CompressConfig {
    /// Include hidden entries (names starting with '.').
    ///
    /// Applies to files and to subdirectories during recursion.
    ///
    /// Default: `false`.
    pub include_hidden: bool,

    /// Follow symbolic links while walking.
    ///
    /// When `false` symlinks are skipped and counted in
    /// [`CompressReport::files_skipped`](crate::CompressReport::files_skipped).
    ///
    /// Default: `false`.
    pub follow_symlinks: bool,

    /// Glob-style patterns of entries to leave out.
    ///
    /// Matched against every component of the path relative to the
    /// directory being compressed. Supports exact names, `*.ext` and
    /// `prefix*`.
    ///
    /// Default: empty.
    pub exclude_patterns: Vec<String>,

    /// Deflate level, 0-9. `Some(0)` stores entries uncompressed, `None`
    /// uses the zip library default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Record source permission bits on each entry.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            include_hidden: false,
            follow_symlinks: false,
            exclude_patterns: Vec::new(),
            compression_level: Some(6),
            preserve_permissions: true,
        }
    }
}

impl CompressConfig {
    /// Creates a new `CompressConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to include hidden entries.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the level is greater than 9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!(level <= 9, "compression level must be 0-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to record permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is set but above 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ZipTreeError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_config_default() {
        let config = CompressConfig::default();
        assert!(!config.include_hidden);
        assert!(!config.follow_symlinks);
        assert!(config.exclude_patterns.is_empty());
        assert_eq!(config.compression_level, Some(6));
        assert!(config.preserve_permissions);
    }

    #[test]
    fn test_compress_config_builder() {
        let config = CompressConfig::new()
            .with_include_hidden(true)
            .with_follow_symlinks(true)
            .with_exclude_patterns(vec!["*.log".to_string()])
            .with_compression_level(0)
            .with_preserve_permissions(false);

        assert!(config.include_hidden);
        assert!(config.follow_symlinks);
        assert_eq!(config.exclude_patterns, vec!["*.log".to_string()]);
        assert_eq!(config.compression_level, Some(0));
        assert!(!config.preserve_permissions);
    }

    #[test]
    fn test_compress_config_validate() {
        assert!(CompressConfig::default().validate().is_ok());

        let config = CompressConfig {
            compression_level: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = CompressConfig {
            compression_level: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ZipTreeError::InvalidCompressionLevel { level: 10 })
        ));
    }

    #[test]
    #[should_panic(expected = "compression level must be 0-9")]
    fn test_compress_config_builder_invalid_level() {
        let _config = CompressConfig::default().with_compression_level(12);
    }
}
