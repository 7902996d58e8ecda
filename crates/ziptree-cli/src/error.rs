//! Error conversion utilities for CLI.
//!
//! Turns `ZipTreeError` values into anyhow errors that name the archive and
//! carry a hint where one helps.

use anyhow::anyhow;
use std::path::Path;
use ziptree_core::ZipTreeError;

/// Converts `ZipTreeError` to a user-facing anyhow error
pub fn convert_error(err: ZipTreeError, archive: &Path) -> anyhow::Error {
    match err {
        ZipTreeError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{}' has entry '{}' that escapes the output directory\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                path.display()
            )
        }
        ZipTreeError::EntryNotFound { name } => {
            anyhow!(
                "Entry '{}' not found in '{}'\n\
                 HINT: Use `ziptree list {}` to see the entry names.",
                name,
                archive.display(),
                archive.display()
            )
        }
        ZipTreeError::SourceNotFound { path } => {
            anyhow!(
                "Source not found: {}\n\
                 HINT: No archive was written.",
                path.display()
            )
        }
        ZipTreeError::OpenFailed { path, source } => {
            anyhow!("Cannot open '{}': {}", path.display(), source)
        }
        ZipTreeError::Archive(zip_err) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The file may be corrupted or not a ZIP archive.",
                archive.display(),
                zip_err
            )
        }
        ZipTreeError::CopyFailed { entry, source } => {
            anyhow!(
                "Failed to copy '{}' in '{}': {}\n\
                 HINT: The archive may be corrupted. Partial output was removed.",
                entry,
                archive.display(),
                source
            )
        }
        ZipTreeError::CloseFailed { source } => {
            anyhow!(
                "Failed to finish archive '{}': {}",
                archive.display(),
                source
            )
        }
        ZipTreeError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {}\n\
                 HINT: Use 0 to store or 1-9 to deflate.",
                level
            )
        }
        ZipTreeError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Converts the error side of a core result
pub fn add_archive_context<T>(
    result: Result<T, ZipTreeError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_error(e, archive))
}
