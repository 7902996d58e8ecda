//! Directory-to-ZIP and ZIP-to-directory helpers.
//!
//! `ziptree-core` turns files, file lists and directory trees into ZIP
//! archives and unpacks archives back onto the filesystem. The container
//! format itself is handled by the [`zip`] crate; this crate provides the
//! walking, naming, permission handling and cleanup around it.
//!
//! Every operation is synchronous and self-contained. Batch operations are
//! all-or-nothing: a failed compression removes the archive it was writing,
//! a failed extraction removes the files it already extracted.
//!
//! # Examples
//!
//! ```no_run
//! use ziptree_core::compress_dir;
//! use ziptree_core::extract_dir;
//! use ziptree_core::list_entries;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = compress_dir("project.zip", "project", true)?;
//! println!("Added {} files", report.files_added);
//!
//! for name in list_entries("project.zip")? {
//!     println!("{name}");
//! }
//!
//! let extracted = extract_dir("project.zip", "restored")?;
//! println!("Extracted {} entries", extracted.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
mod cleanup;
pub mod codec;
pub mod compress;
pub mod config;
pub mod copy;
pub mod error;
pub mod extract;
pub mod filters;
pub mod list;
pub mod paths;
pub mod progress;
pub mod report;

#[cfg(test)]
mod test_utils;

pub use archive::ArchiveReader;
pub use archive::ArchiveWriter;
pub use archive::EntryInfo;
pub use archive::WriteMode;
pub use codec::Cp437;
pub use codec::NameCodec;
pub use codec::Utf8Lossy;
pub use compress::compress_dir;
pub use compress::compress_dir_with;
pub use compress::compress_file;
pub use compress::compress_file_into;
pub use compress::compress_files;
pub use compress::compress_files_with;
pub use compress::compress_subtree;
pub use compress::compress_subtree_with_progress;
pub use config::CompressConfig;
pub use copy::CHUNK_SIZE;
pub use copy::CopyBuffer;
pub use copy::copy_data;
pub use error::ErrorCategory;
pub use error::Result;
pub use error::ZipTreeError;
pub use extract::extract_dir;
pub use extract::extract_dir_from;
pub use extract::extract_dir_with_codec;
pub use extract::extract_entry;
pub use extract::extract_file;
pub use extract::extract_file_from;
pub use extract::extract_files;
pub use extract::extract_files_from;
pub use list::list_entries;
pub use list::list_entries_from;
pub use list::list_entry_info;
pub use list::list_entry_info_from;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::CompressReport;
