//! Archive listing.

use std::io::Read;
use std::io::Seek;
use std::path::Path;

use crate::ArchiveReader;
use crate::EntryInfo;
use crate::Result;

/// Returns the entry names of the archive at `archive`, in central
/// directory order.
///
/// An empty archive yields an empty list.
///
/// # Errors
///
/// Fails if the archive cannot be opened or an entry header cannot be read.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::list_entries;
///
/// for name in list_entries("bundle.zip")? {
///     println!("{name}");
/// }
/// # Ok::<(), ziptree_core::ZipTreeError>(())
/// ```
pub fn list_entries<P: AsRef<Path>>(archive: P) -> Result<Vec<String>> {
    let mut reader = ArchiveReader::open(archive)?;
    list_entries_from(&mut reader)
}

/// Like [`list_entries`] on an already opened reader.
pub fn list_entries_from<R: Read + Seek>(reader: &mut ArchiveReader<R>) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(reader.len());
    let mut more = reader.go_to_first_entry();
    while more {
        names.push(reader.current_entry_name()?);
        more = reader.go_to_next_entry();
    }
    Ok(names)
}

/// Returns the full metadata of every entry of the archive at `archive`.
///
/// # Errors
///
/// Fails if the archive cannot be opened or an entry header cannot be read.
pub fn list_entry_info<P: AsRef<Path>>(archive: P) -> Result<Vec<EntryInfo>> {
    let mut reader = ArchiveReader::open(archive)?;
    list_entry_info_from(&mut reader)
}

/// Like [`list_entry_info`] on an already opened reader.
pub fn list_entry_info_from<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
) -> Result<Vec<EntryInfo>> {
    let mut entries = Vec::with_capacity(reader.len());
    let mut more = reader.go_to_first_entry();
    while more {
        entries.push(reader.current_entry_info()?);
        more = reader.go_to_next_entry();
    }
    Ok(entries)
}
