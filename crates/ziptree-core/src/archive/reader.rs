//! Read-side archive handle with an entry cursor.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use zip::ZipArchive;

use crate::NameCodec;
use crate::Result;
use crate::ZipTreeError;

/// Metadata of a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name, decoded with the reader's codec.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Unix mode recorded in the external attributes, if any.
    pub unix_mode: Option<u32>,
    /// Whether the entry is a directory marker (name ends with `/`).
    pub is_dir: bool,
}

/// Mode bits carried over to extracted files.
const PERMISSION_BITS: u32 = 0o777;

impl EntryInfo {
    /// Owner, group and other read/write/execute bits of the entry, or
    /// `None` when none were recorded.
    ///
    /// Setuid, setgid and sticky bits are never returned, so they are never
    /// restored on extraction.
    #[must_use]
    pub fn permissions(&self) -> Option<u32> {
        self.unix_mode
            .map(|mode| mode & PERMISSION_BITS)
            .filter(|&bits| bits != 0)
    }
}

/// An archive opened for reading.
///
/// The reader keeps a cursor on the current entry. After opening it points
/// at the first entry (or nowhere for an empty archive) and is moved with
/// [`go_to_first_entry`](Self::go_to_first_entry),
/// [`go_to_next_entry`](Self::go_to_next_entry) and
/// [`set_current_entry`](Self::set_current_entry).
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::ArchiveReader;
///
/// let mut reader = ArchiveReader::open("bundle.zip")?;
/// let mut more = reader.go_to_first_entry();
/// while more {
///     println!("{}", reader.current_entry_name()?);
///     more = reader.go_to_next_entry();
/// }
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub struct ArchiveReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    codec: Option<Box<dyn NameCodec>>,
    current: Option<usize>,
    path: Option<PathBuf>,
}

impl ArchiveReader<File> {
    /// Opens the archive file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::OpenFailed`] if the file cannot be opened and
    /// [`ZipTreeError::Archive`] if it is not a ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ZipTreeError::open_failed(path, e))?;
        let mut reader = Self::new(file)?;
        reader.path = Some(path.to_path_buf());
        log::debug!("opened {} ({} entries)", path.display(), reader.len());
        Ok(reader)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Reads the central directory of a caller-supplied stream.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::Archive`] if the stream is not a ZIP archive.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        let current = (!archive.is_empty()).then_some(0);
        Ok(Self {
            archive,
            codec: None,
            current,
            path: None,
        })
    }

    /// Decodes entry names with `codec` instead of the zip library default.
    #[must_use]
    pub fn with_name_codec(mut self, codec: Box<dyn NameCodec>) -> Self {
        log::debug!("decoding entry names as {}", codec.label());
        self.codec = Some(codec);
        self
    }

    /// Path of the archive file, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Index of the current entry, if the cursor points at one.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Moves the cursor to the first entry. Returns `false` if the archive
    /// is empty.
    pub fn go_to_first_entry(&mut self) -> bool {
        self.current = (!self.is_empty()).then_some(0);
        self.current.is_some()
    }

    /// Moves the cursor to the next entry. Returns `false`, leaving the
    /// cursor nowhere, once the last entry has been passed.
    pub fn go_to_next_entry(&mut self) -> bool {
        self.current = self
            .current
            .map(|index| index + 1)
            .filter(|&next| next < self.archive.len());
        self.current.is_some()
    }

    /// Moves the cursor to the entry called `name`.
    ///
    /// Names are compared after decoding with the reader's codec.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::EntryNotFound`] if no entry has that name;
    /// the cursor is left where it was.
    pub fn set_current_entry(&mut self, name: &str) -> Result<()> {
        let index = if self.codec.is_some() {
            let mut found = None;
            for index in 0..self.archive.len() {
                if self.decoded_name(index)? == name {
                    found = Some(index);
                    break;
                }
            }
            found
        } else {
            self.archive.index_for_name(name)
        };

        self.current = Some(index.ok_or_else(|| ZipTreeError::EntryNotFound {
            name: name.to_string(),
        })?);
        Ok(())
    }

    /// Name of the current entry.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::NoCurrentEntry`] if the cursor points
    /// nowhere.
    pub fn current_entry_name(&mut self) -> Result<String> {
        let index = self.current.ok_or(ZipTreeError::NoCurrentEntry)?;
        self.decoded_name(index)
    }

    /// Metadata of the current entry.
    ///
    /// # Errors
    ///
    /// Returns [`ZipTreeError::NoCurrentEntry`] if the cursor points
    /// nowhere and [`ZipTreeError::Archive`] if the entry header cannot be
    /// read.
    pub fn current_entry_info(&mut self) -> Result<EntryInfo> {
        let index = self.current.ok_or(ZipTreeError::NoCurrentEntry)?;
        let name = self.decoded_name(index)?;
        let entry = self.archive.by_index_raw(index)?;
        Ok(EntryInfo {
            is_dir: name.ends_with('/'),
            name,
            size: entry.size(),
            compressed_size: entry.compressed_size(),
            unix_mode: entry.unix_mode(),
        })
    }

    /// Opens the current entry for streaming decompression.
    ///
    /// CRC mismatches surface as read errors once the entry is fully read.
    pub(crate) fn open_current(&mut self) -> Result<impl Read + '_> {
        let index = self.current.ok_or(ZipTreeError::NoCurrentEntry)?;
        Ok(self.archive.by_index(index)?)
    }

    fn decoded_name(&mut self, index: usize) -> Result<String> {
        match &self.codec {
            Some(codec) => {
                let entry = self.archive.by_index_raw(index)?;
                Ok(codec.decode(entry.name_raw()))
            }
            None => self
                .archive
                .name_for_index(index)
                .map(str::to_string)
                .ok_or(ZipTreeError::InvalidHandle {
                    reason: "entry index out of range",
                }),
        }
    }

    /// Closes the reader, releasing the underlying stream.
    ///
    /// Reading never leaves pending state behind, so closing cannot fail.
    pub fn into_inner(self) -> R {
        self.archive.into_inner()
    }
}

impl<R: Read + Seek> std::fmt::Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("path", &self.path)
            .field("entries", &self.len())
            .field("current", &self.current)
            .field("codec", &self.codec.as_ref().map(|c| c.label()))
            .finish_non_exhaustive()
    }
}
