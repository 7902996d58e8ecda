//! Archive handles: sessions over a ZIP container.
//!
//! [`ArchiveWriter`] owns a `zip::ZipWriter` opened in one of the
//! [`WriteMode`]s; [`ArchiveReader`] owns a `zip::ZipArchive` plus a cursor
//! over its central directory. Both are plain values scoped to the
//! operation using them and release their stream on drop.

mod reader;
mod writer;

pub use reader::ArchiveReader;
pub use reader::EntryInfo;
pub use writer::ArchiveWriter;
pub use writer::WriteMode;
