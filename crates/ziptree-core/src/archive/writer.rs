//! Write-side archive handle.

use std::fs::File;
use std::fs::Metadata;
use std::fs::OpenOptions;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::CompressConfig;
use crate::Result;
use crate::ZipTreeError;

/// Size from which entries are written with Zip64 extensions.
const LARGE_FILE_THRESHOLD: u64 = 0xFFFF_FFFF;

/// How an archive file is opened for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Create a new archive, truncating any existing file.
    #[default]
    Create,
    /// Add entries to an existing archive.
    Add,
    /// Write a new archive after the existing bytes of a file, for example
    /// behind a self-extracting stub.
    Append,
}

/// An archive opened for writing.
///
/// Entries are added with the compress operations
/// ([`compress_file_into`](crate::compress_file_into),
/// [`compress_subtree`](crate::compress_subtree)). Once [`close`](Self::close)
/// has run the handle is invalid and every further write fails with
/// [`ZipTreeError::InvalidHandle`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ziptree_core::ArchiveWriter;
/// use ziptree_core::WriteMode;
/// use ziptree_core::compress_file_into;
///
/// let mut writer = ArchiveWriter::create("out.zip", WriteMode::Create)?;
/// compress_file_into(&mut writer, Path::new("notes.txt"), "notes.txt")?;
/// writer.close()?;
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub struct ArchiveWriter<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    mode: WriteMode,
    path: Option<PathBuf>,
    options: SimpleFileOptions,
    preserve_permissions: bool,
}

impl ArchiveWriter<File> {
    /// Opens the archive file at `path` in the given mode.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::OpenFailed`] if the file cannot be opened and
    /// [`ZipTreeError::Archive`] if [`WriteMode::Add`] is used on a file
    /// that is not a readable ZIP archive.
    pub fn create<P: AsRef<Path>>(path: P, mode: WriteMode) -> Result<Self> {
        let path = path.as_ref();
        let open_failed = |e: std::io::Error| ZipTreeError::open_failed(path, e);

        let zip = match mode {
            WriteMode::Create => ZipWriter::new(File::create(path).map_err(open_failed)?),
            WriteMode::Add => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(path)
                    .map_err(open_failed)?;
                ZipWriter::new_append(file)?
            }
            WriteMode::Append => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(path)
                    .map_err(open_failed)?;
                file.seek(SeekFrom::End(0))?;
                ZipWriter::new(file)
            }
        };

        // The file exists now, so canonicalization only fails on exotic
        // filesystems; fall back to the path as given.
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        log::debug!("opened {} for writing ({mode:?})", canonical.display());

        let mut writer = Self::from_zip(zip, mode);
        writer.path = Some(canonical);
        Ok(writer)
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Starts a new archive on a caller-supplied stream.
    pub fn new(writer: W) -> Self {
        Self::from_zip(ZipWriter::new(writer), WriteMode::Create)
    }

    fn from_zip(zip: ZipWriter<W>, mode: WriteMode) -> Self {
        Self {
            zip: Some(zip),
            mode,
            path: None,
            options: entry_options(&CompressConfig::default()),
            preserve_permissions: true,
        }
    }

    /// Applies the compression level and permission settings of `config`
    /// to every entry written afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::InvalidCompressionLevel`] if the level is
    /// above 9.
    pub fn with_config(mut self, config: &CompressConfig) -> Result<Self> {
        config.validate()?;
        self.options = entry_options(config);
        self.preserve_permissions = config.preserve_permissions;
        Ok(self)
    }

    /// The mode this handle was opened in.
    #[must_use]
    pub const fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Canonical path of the archive file, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns `false` once the archive has been closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.zip.is_some()
    }

    pub(crate) fn zip_mut(&mut self) -> Result<&mut ZipWriter<W>> {
        self.zip.as_mut().ok_or(ZipTreeError::InvalidHandle {
            reason: "archive already closed",
        })
    }

    /// Options for an entry copied from a file with the given metadata.
    pub(crate) fn options_for(&self, metadata: &Metadata) -> SimpleFileOptions {
        let mut options = self.options;
        if metadata.len() >= LARGE_FILE_THRESHOLD {
            options = options.large_file(true);
        }
        if self.preserve_permissions {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                options = options.unix_permissions(metadata.permissions().mode() & 0o777);
            }
        }
        options
    }

    /// Writes the central directory and releases the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::InvalidHandle`] if the archive was already
    /// closed and [`ZipTreeError::CloseFailed`] if finishing the archive
    /// fails.
    pub fn close(&mut self) -> Result<W> {
        let zip = self.zip.take().ok_or(ZipTreeError::InvalidHandle {
            reason: "archive already closed",
        })?;
        let inner = zip
            .finish()
            .map_err(|source| ZipTreeError::CloseFailed { source })?;
        if let Some(path) = &self.path {
            log::debug!("closed {}", path.display());
        }
        Ok(inner)
    }
}

impl<W: Write + Seek> std::fmt::Debug for ArchiveWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("mode", &self.mode)
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

fn entry_options(config: &CompressConfig) -> SimpleFileOptions {
    match config.compression_level {
        Some(0) => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        level => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(level.map(i64::from)),
    }
}
