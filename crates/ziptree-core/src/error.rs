//! Error types for archive compression, extraction and listing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ZipTreeError`.
pub type Result<T> = std::result::Result<T, ZipTreeError>;

/// Broad failure classes shared by every operation.
///
/// Callers that only care about *why* an operation failed (for exit codes or
/// retry decisions) can match on this instead of the full error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The archive handle is closed, positioned nowhere, or cannot serve the
    /// request.
    InvalidHandle,
    /// A source file, destination file or the archive itself could not be
    /// opened.
    Open,
    /// A read or write during byte transfer failed or was short.
    Copy,
    /// The zip library reported an error for a write, close or entry-info
    /// call.
    ArchiveProtocol,
    /// Closing the archive failed after otherwise successful work.
    Close,
    /// Anything else: plain I/O, path policy, configuration.
    Other,
}

/// Errors that can occur while building or unpacking ZIP archives.
#[derive(Error, Debug)]
pub enum ZipTreeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip library rejected an operation.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive handle cannot be used for this operation.
    #[error("invalid archive handle: {reason}")]
    InvalidHandle {
        /// Why the handle was rejected.
        reason: &'static str,
    },

    /// The reader cursor does not point at any entry.
    #[error("no current entry in archive")]
    NoCurrentEntry,

    /// A named entry does not exist in the archive.
    #[error("entry not found in archive: {name}")]
    EntryNotFound {
        /// The requested entry name.
        name: String,
    },

    /// A file could not be opened.
    #[error("cannot open {path}: {source}")]
    OpenFailed {
        /// The file that failed to open.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A source path passed by the caller does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Copying bytes between a file and an archive entry failed.
    #[error("failed to copy data for entry '{entry}': {source}")]
    CopyFailed {
        /// Entry name inside the archive.
        entry: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Finishing the archive (writing the central directory) failed.
    #[error("failed to close archive: {source}")]
    CloseFailed {
        /// Underlying error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Entry name would resolve outside the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name or path.
        path: PathBuf,
    },

    /// A subtree being compressed is not located under its origin directory.
    #[error("path {path} is not under origin directory {origin}")]
    OutsideOrigin {
        /// The directory being walked.
        path: PathBuf,
        /// The origin used to compute entry names.
        origin: PathBuf,
    },

    /// Compression level outside 0-9.
    #[error("invalid compression level {level}, must be 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Entry names must be valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },
}

impl ZipTreeError {
    /// Maps this error onto its broad failure class.
    ///
    /// # Examples
    ///
    /// ```
    /// use ziptree_core::ErrorCategory;
    /// use ziptree_core::ZipTreeError;
    ///
    /// let err = ZipTreeError::NoCurrentEntry;
    /// assert_eq!(err.category(), ErrorCategory::InvalidHandle);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidHandle { .. } | Self::NoCurrentEntry | Self::EntryNotFound { .. } => {
                ErrorCategory::InvalidHandle
            }
            Self::OpenFailed { .. } | Self::SourceNotFound { .. } => ErrorCategory::Open,
            Self::CopyFailed { .. } => ErrorCategory::Copy,
            Self::Archive(_) => ErrorCategory::ArchiveProtocol,
            Self::CloseFailed { .. } => ErrorCategory::Close,
            Self::Io(_)
            | Self::PathTraversal { .. }
            | Self::OutsideOrigin { .. }
            | Self::InvalidCompressionLevel { .. }
            | Self::NonUtf8Path { .. } => ErrorCategory::Other,
        }
    }

    /// Returns `true` if this error represents an attempt to escape the
    /// destination directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use ziptree_core::ZipTreeError;
    ///
    /// let err = ZipTreeError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    /// assert!(!ZipTreeError::NoCurrentEntry.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    pub(crate) fn open_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn copy_failed(entry: impl Into<String>, source: std::io::Error) -> Self {
        Self::CopyFailed {
            entry: entry.into(),
            source,
        }
    }
}
