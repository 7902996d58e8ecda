//! Extraction: single entries, entry lists and whole archives.
//!
//! Batch extraction is all-or-nothing: if any entry fails, every file
//! written earlier in the same call is removed before the error is
//! returned. Directories created along the way are left in place.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveReader;
use crate::NameCodec;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::ZipTreeError;
use crate::cleanup::ExtractedFiles;
use crate::cleanup::OutputGuard;
use crate::copy::CopyBuffer;
use crate::copy::copy_data;
use crate::paths;

/// Extracts one entry to `dest`.
///
/// With `name` set (and non-empty) the cursor is first moved to that
/// entry; otherwise the current entry is used.
///
/// If `dest` ends with a path separator only a directory is created and
/// given the entry's permission bits. Otherwise parent directories are
/// created and the decompressed bytes are written to `dest`, which then
/// receives the entry's permission bits. A partially written `dest` is
/// removed if copying fails.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - [`ZipTreeError::EntryNotFound`] if `name` does not exist
/// - [`ZipTreeError::NoCurrentEntry`] if no name was given and the cursor
///   points nowhere
/// - [`ZipTreeError::OpenFailed`] if `dest` cannot be created
/// - [`ZipTreeError::CopyFailed`] if decompression (including the CRC
///   check) or writing fails
pub fn extract_entry<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    name: Option<&str>,
    dest: &Path,
) -> Result<u64> {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        reader.set_current_entry(name)?;
    }
    let info = reader.current_entry_info()?;

    if paths::has_trailing_separator(dest) {
        std::fs::create_dir_all(dest)?;
        apply_permissions(dest, info.permissions());
        log::trace!("created directory {}", dest.display());
        return Ok(0);
    }

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut entry = reader.open_current()?;
    // Declared before the file so the file is closed before removal.
    let guard = OutputGuard::new(dest);
    let mut out = File::create(dest).map_err(|e| ZipTreeError::open_failed(dest, e))?;

    let mut buffer = CopyBuffer::new();
    let bytes = copy_data(&mut entry, &mut out, &mut buffer)
        .map_err(|e| ZipTreeError::copy_failed(&info.name, e))?;
    drop(out);
    guard.commit();

    apply_permissions(dest, info.permissions());
    log::trace!("extracted {} -> {} ({bytes} bytes)", info.name, dest.display());
    Ok(bytes)
}

/// Extracts the entry `entry` of the archive at `archive`.
///
/// When `dest` is `None` the entry name is used as the destination path,
/// relative to the current directory. An empty `entry` selects the first
/// entry.
///
/// Returns the absolute destination path.
///
/// # Errors
///
/// [`ZipTreeError::OpenFailed`] or [`ZipTreeError::Archive`] if the
/// archive cannot be opened, otherwise see [`extract_entry`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ziptree_core::extract_file;
///
/// let path = extract_file("bundle.zip", "docs/readme.txt", Some(Path::new("readme.txt")))?;
/// assert!(path.is_absolute());
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn extract_file<P: AsRef<Path>>(
    archive: P,
    entry: &str,
    dest: Option<&Path>,
) -> Result<PathBuf> {
    let mut reader = ArchiveReader::open(archive)?;
    extract_file_from(&mut reader, entry, dest)
}

/// Like [`extract_file`] on an already opened reader.
pub fn extract_file_from<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    entry: &str,
    dest: Option<&Path>,
) -> Result<PathBuf> {
    let dest = match dest {
        Some(dest) => dest.to_path_buf(),
        None if entry.is_empty() => PathBuf::from(reader.current_entry_name()?),
        None => PathBuf::from(entry),
    };

    extract_entry(reader, Some(entry), &dest)?;
    Ok(paths::absolute(&dest)?)
}

/// Extracts the named entries of the archive at `archive` into `dir`.
///
/// Each entry lands at `<dir>/<name>`. Returns the absolute destination
/// paths in the order of `entries`.
///
/// # Errors
///
/// Fails on the first entry that cannot be extracted, after removing every
/// file this call already wrote. Names that would resolve outside `dir`
/// fail with [`ZipTreeError::PathTraversal`].
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::extract_files;
///
/// let paths = extract_files("bundle.zip", &["a.txt", "docs/b.txt"], "out")?;
/// assert_eq!(paths.len(), 2);
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn extract_files<P: AsRef<Path>, S: AsRef<str>, D: AsRef<Path>>(
    archive: P,
    entries: &[S],
    dir: D,
) -> Result<Vec<PathBuf>> {
    let mut reader = ArchiveReader::open(archive)?;
    extract_files_from(&mut reader, entries, dir.as_ref(), &mut NoopProgress)
}

/// Like [`extract_files`] on an already opened reader, reporting every
/// entry to `progress`.
pub fn extract_files_from<R: Read + Seek, S: AsRef<str>>(
    reader: &mut ArchiveReader<R>,
    entries: &[S],
    dir: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<Vec<PathBuf>> {
    let base = paths::clean_path(&paths::absolute(dir)?);
    log::debug!("extracting {} entries into {}", entries.len(), base.display());

    let mut extracted = ExtractedFiles::new();
    let total = entries.len();

    for (index, name) in entries.iter().enumerate() {
        let name = name.as_ref();
        let dest = resolve_destination(&base, name).ok_or_else(|| ZipTreeError::PathTraversal {
            path: PathBuf::from(name),
        })?;

        progress.on_entry_start(Path::new(name), total, index + 1);
        let bytes = extract_entry(reader, Some(name), &dest)?;
        progress.on_bytes_written(bytes);
        progress.on_entry_complete(Path::new(name));
        extracted.push(dest);
    }

    progress.on_complete();
    Ok(extracted.into_paths())
}

/// Extracts every entry of the archive at `archive` into `dir`.
///
/// Entries whose destination would fall outside `dir` (through `..`
/// segments or rooted names) are skipped. Returns the absolute paths of
/// everything extracted, in archive order; an empty archive yields an
/// empty list.
///
/// # Errors
///
/// Fails on the first entry that cannot be extracted, after removing every
/// file this call already wrote.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::extract_dir;
///
/// let paths = extract_dir("bundle.zip", "out")?;
/// println!("extracted {} entries", paths.len());
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn extract_dir<P: AsRef<Path>, D: AsRef<Path>>(archive: P, dir: D) -> Result<Vec<PathBuf>> {
    let mut reader = ArchiveReader::open(archive)?;
    extract_dir_from(&mut reader, dir.as_ref(), &mut NoopProgress)
}

/// Like [`extract_dir`], decoding entry names with `codec`.
pub fn extract_dir_with_codec<P: AsRef<Path>, D: AsRef<Path>>(
    archive: P,
    codec: Box<dyn NameCodec>,
    dir: D,
) -> Result<Vec<PathBuf>> {
    let mut reader = ArchiveReader::open(archive)?.with_name_codec(codec);
    extract_dir_from(&mut reader, dir.as_ref(), &mut NoopProgress)
}

/// Like [`extract_dir`] on an already opened reader, reporting every entry
/// to `progress`.
pub fn extract_dir_from<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    dir: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<Vec<PathBuf>> {
    let base = paths::clean_path(&paths::absolute(dir)?);
    log::debug!("extracting {} entries into {}", reader.len(), base.display());

    let mut extracted = ExtractedFiles::new();
    let total = reader.len();
    let mut current = 0;

    let mut more = reader.go_to_first_entry();
    while more {
        current += 1;
        let name = reader.current_entry_name()?;

        match resolve_destination(&base, &name) {
            Some(dest) => {
                progress.on_entry_start(Path::new(&name), total, current);
                let bytes = extract_entry(reader, None, &dest)?;
                progress.on_bytes_written(bytes);
                progress.on_entry_complete(Path::new(&name));
                extracted.push(dest);
            }
            None => log::warn!("skipping entry outside the target directory: {name}"),
        }

        more = reader.go_to_next_entry();
    }

    progress.on_complete();
    let extracted = extracted.into_paths();
    log::debug!("extracted {} entries", extracted.len());
    Ok(extracted)
}

/// Maps an entry name onto `base`, or `None` if the result would not lie
/// strictly inside `base`. Directory entries keep their trailing `/`.
fn resolve_destination(base: &Path, name: &str) -> Option<PathBuf> {
    let dest = paths::clean_path(&base.join(name));
    if !paths::is_strictly_within(&dest, base) {
        return None;
    }
    if name.ends_with('/') {
        Some(paths::with_trailing_separator(dest))
    } else {
        Some(dest)
    }
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode
        && let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    {
        log::warn!("failed to set permissions on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _mode: Option<u32>) {}
