//! Compression: single files, file lists and directory trees.
//!
//! Handle-level operations ([`compress_file_into`], [`compress_subtree`])
//! write into a caller-owned [`ArchiveWriter`] and never delete anything.
//! Path-level operations ([`compress_file`], [`compress_files`],
//! [`compress_dir`]) own the archive file: they create it, close it, and
//! remove it again if any step fails.

use std::cmp::Ordering;
use std::fs::File;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::ArchiveWriter;
use crate::CompressConfig;
use crate::CompressReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::WriteMode;
use crate::ZipTreeError;
use crate::cleanup::OutputGuard;
use crate::copy::CopyBuffer;
use crate::copy::copy_data;
use crate::filters;
use crate::paths;

/// Adds the file at `source` to the archive as `entry_name`.
///
/// The entry records the file's permission bits (unless disabled in the
/// writer's config) and switches to Zip64 for files of 4 GiB or more.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// - [`ZipTreeError::InvalidHandle`] if the writer was closed
/// - [`ZipTreeError::OpenFailed`] if the source cannot be opened or is a
///   directory
/// - [`ZipTreeError::Archive`] if the entry cannot be started
/// - [`ZipTreeError::CopyFailed`] if reading the source or writing the
///   entry fails
pub fn compress_file_into<W: Write + Seek>(
    writer: &mut ArchiveWriter<W>,
    source: &Path,
    entry_name: &str,
) -> Result<u64> {
    if !writer.is_open() {
        return Err(ZipTreeError::InvalidHandle {
            reason: "archive already closed",
        });
    }

    let mut file = File::open(source).map_err(|e| ZipTreeError::open_failed(source, e))?;
    let metadata = file
        .metadata()
        .map_err(|e| ZipTreeError::open_failed(source, e))?;
    if metadata.is_dir() {
        return Err(ZipTreeError::open_failed(
            source,
            std::io::ErrorKind::IsADirectory.into(),
        ));
    }

    let options = writer.options_for(&metadata);
    let zip = writer.zip_mut()?;
    zip.start_file(entry_name, options)?;

    let mut buffer = CopyBuffer::new();
    let bytes = copy_data(&mut file, zip, &mut buffer)
        .map_err(|e| ZipTreeError::copy_failed(entry_name, e))?;

    log::trace!("added {entry_name} ({bytes} bytes)");
    Ok(bytes)
}

/// Compresses the files below `dir` into the archive.
///
/// Entry names are the base name of `origin` joined with each file's path
/// relative to `origin`, with `/` separators. When `recursive` is set, the
/// files of every subdirectory are added first (depth first), followed by
/// the direct files of `dir`; siblings go in file-name order. Hidden
/// entries, excluded patterns, symlinks (unless followed), non-regular
/// files and the archive file itself are left out.
///
/// On failure the archive is left as it is; the caller owns it.
///
/// # Errors
///
/// - [`ZipTreeError::SourceNotFound`] if `dir` is not a directory
/// - [`ZipTreeError::OutsideOrigin`] if `dir` is not below `origin`
/// - any error of [`compress_file_into`], for the first file that fails
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ziptree_core::ArchiveWriter;
/// use ziptree_core::CompressConfig;
/// use ziptree_core::WriteMode;
/// use ziptree_core::compress_subtree;
///
/// let mut writer = ArchiveWriter::create("site.zip", WriteMode::Create)?;
/// let report = compress_subtree(
///     &mut writer,
///     Path::new("site/assets"),
///     Path::new("site"),
///     true,
///     &CompressConfig::default(),
/// )?;
/// writer.close()?;
/// // Entries are named "site/assets/..."
/// println!("Added {} files", report.files_added);
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn compress_subtree<W: Write + Seek>(
    writer: &mut ArchiveWriter<W>,
    dir: &Path,
    origin: &Path,
    recursive: bool,
    config: &CompressConfig,
) -> Result<CompressReport> {
    compress_subtree_with_progress(writer, dir, origin, recursive, config, &mut NoopProgress)
}

/// Like [`compress_subtree`], reporting every file to `progress`.
pub fn compress_subtree_with_progress<W: Write + Seek>(
    writer: &mut ArchiveWriter<W>,
    dir: &Path,
    origin: &Path,
    recursive: bool,
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CompressReport> {
    let start = Instant::now();
    let mut report = CompressReport::new();
    add_subtree(writer, dir, origin, recursive, config, progress, &mut report)?;
    report.duration = start.elapsed();
    progress.on_complete();
    Ok(report)
}

/// Creates `archive` containing the single file `file`, stored under its
/// base name.
///
/// # Errors
///
/// See [`compress_files`]. The archive file never survives a failure.
pub fn compress_file<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, file: Q) -> Result<CompressReport> {
    compress_files(archive, &[file])
}

/// Creates `archive` containing each of `files`, in order, stored under
/// their base names.
///
/// Parent directories of `archive` are created as needed and an existing
/// archive is overwritten.
///
/// # Errors
///
/// - [`ZipTreeError::SourceNotFound`] if one of `files` does not exist
/// - [`ZipTreeError::OpenFailed`] if the archive cannot be created
/// - [`ZipTreeError::CloseFailed`] if the archive cannot be finished
/// - any error of [`compress_file_into`]
///
/// On every error the archive file is removed.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::compress_files;
///
/// let report = compress_files("out.zip", &["a.txt", "b.txt"])?;
/// assert_eq!(report.entries, vec!["a.txt", "b.txt"]);
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn compress_files<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    files: &[Q],
) -> Result<CompressReport> {
    compress_files_with(archive, files, &CompressConfig::default(), &mut NoopProgress)
}

/// Like [`compress_files`] with an explicit config and progress callback.
///
/// Only the compression level and permission settings of `config` apply;
/// the walk filters are meaningless for an explicit file list.
pub fn compress_files_with<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    files: &[Q],
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CompressReport> {
    let archive = archive.as_ref();
    log::debug!("compressing {} files into {}", files.len(), archive.display());

    write_new_archive(archive, config, progress, |writer, report, progress| {
        let total = files.len();
        for (index, file) in files.iter().enumerate() {
            let file = file.as_ref();
            if !file.exists() {
                return Err(ZipTreeError::SourceNotFound {
                    path: file.to_path_buf(),
                });
            }
            let name = file
                .file_name()
                .ok_or_else(|| ZipTreeError::SourceNotFound {
                    path: file.to_path_buf(),
                })?
                .to_str()
                .ok_or_else(|| ZipTreeError::NonUtf8Path {
                    path: file.to_path_buf(),
                })?;
            add_entry(writer, file, name, report, progress, total, index + 1)?;
        }
        Ok(())
    })
}

/// Creates `archive` from the directory `dir`.
///
/// Entries are named `<dir name>/<relative path>`. With `recursive` unset
/// only the direct files of `dir` are added.
///
/// # Errors
///
/// - [`ZipTreeError::SourceNotFound`] if `dir` is not a directory
/// - any error of [`compress_files`] or [`compress_subtree`]
///
/// On every error the archive file is removed.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::compress_dir;
///
/// let report = compress_dir("backup/project.zip", "project", true)?;
/// println!("{} files, {:.1}% saved", report.files_added, report.compression_percentage());
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn compress_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    dir: Q,
    recursive: bool,
) -> Result<CompressReport> {
    compress_dir_with(
        archive,
        dir,
        recursive,
        &CompressConfig::default(),
        &mut NoopProgress,
    )
}

/// Like [`compress_dir`] with an explicit config and progress callback.
pub fn compress_dir_with<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    dir: Q,
    recursive: bool,
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CompressReport> {
    let archive = archive.as_ref();
    let dir = dir.as_ref();
    log::debug!(
        "compressing {} into {} (recursive: {recursive})",
        dir.display(),
        archive.display()
    );

    write_new_archive(archive, config, progress, |writer, report, progress| {
        add_subtree(writer, dir, dir, recursive, config, progress, report)
    })
}

/// Creates a fresh archive at `archive`, runs `body` on it and closes it.
///
/// The archive file is removed if `body` or closing fails.
fn write_new_archive<F>(
    archive: &Path,
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
    body: F,
) -> Result<CompressReport>
where
    F: FnOnce(&mut ArchiveWriter<File>, &mut CompressReport, &mut dyn ProgressCallback) -> Result<()>,
{
    config.validate()?;
    let start = Instant::now();

    if let Some(parent) = archive.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    // Declared before the writer so the writer is dropped first and the
    // file is removed after it is released.
    let guard = OutputGuard::new(archive);
    let mut writer = ArchiveWriter::create(archive, WriteMode::Create)?.with_config(config)?;

    let mut report = CompressReport::new();
    body(&mut writer, &mut report, progress)?;
    writer.close()?;

    report.bytes_compressed = std::fs::metadata(archive)?.len();
    report.duration = start.elapsed();
    guard.commit();
    progress.on_complete();

    log::debug!(
        "wrote {} ({} entries, {} bytes)",
        archive.display(),
        report.files_added,
        report.bytes_compressed
    );
    Ok(report)
}

fn add_subtree<W: Write + Seek>(
    writer: &mut ArchiveWriter<W>,
    dir: &Path,
    origin: &Path,
    recursive: bool,
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
    report: &mut CompressReport,
) -> Result<()> {
    if !dir.is_dir() {
        return Err(ZipTreeError::SourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    // Absolute, cleaned paths so that "." and ".." still yield a base name.
    let dir = paths::clean_path(&paths::absolute(dir)?);
    let origin = paths::clean_path(&paths::absolute(origin)?);
    if !dir.starts_with(&origin) {
        return Err(ZipTreeError::OutsideOrigin { path: dir, origin });
    }

    let files = collect_files(writer.path(), &dir, recursive, config, report)?;
    let total = files.len();

    for (index, path) in files.iter().enumerate() {
        let name = filters::entry_name(path, &origin)?;
        add_entry(writer, path, &name, report, progress, total, index + 1)?;
    }

    Ok(())
}

/// Walks `dir` and returns the files to archive, in archive order.
///
/// Skipped symlinks and the archive itself are counted in `report`.
fn collect_files(
    archive_path: Option<&Path>,
    dir: &Path,
    recursive: bool,
    config: &CompressConfig,
    report: &mut CompressReport,
) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir)
        .follow_links(config.follow_symlinks)
        .contents_first(true)
        .sort_by(dirs_then_name);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    let entries = walker.into_iter().filter_entry(|entry| {
        entry.depth() == 0 || !filters::should_skip(relative_to(entry.path(), dir), config)
    });

    for entry in entries {
        let entry = entry.map_err(std::io::Error::from)?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            report.files_skipped += 1;
            report.add_warning(format!("Skipped symlink: {}", entry.path().display()));
            log::warn!("skipping symlink {}", entry.path().display());
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        if let Some(archive_path) = archive_path
            && entry.path().canonicalize().is_ok_and(|p| p == archive_path)
        {
            report.files_skipped += 1;
            log::debug!("skipping the archive itself: {}", entry.path().display());
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}

/// Subdirectories before files, each group in case-insensitive file-name
/// order with byte order breaking ties. Combined with `contents_first` this
/// yields every subdirectory's files before the direct files of its parent.
fn dirs_then_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| {
            let fold = |e: &DirEntry| e.file_name().to_string_lossy().to_lowercase();
            fold(a).cmp(&fold(b))
        })
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn add_entry<W: Write + Seek>(
    writer: &mut ArchiveWriter<W>,
    source: &Path,
    name: &str,
    report: &mut CompressReport,
    progress: &mut dyn ProgressCallback,
    total: usize,
    current: usize,
) -> Result<()> {
    progress.on_entry_start(Path::new(name), total, current);
    let bytes = compress_file_into(writer, source, name)?;
    progress.on_bytes_written(bytes);
    progress.on_entry_complete(Path::new(name));

    report.files_added += 1;
    report.bytes_written += bytes;
    report.entries.push(name.to_string());
    Ok(())
}
