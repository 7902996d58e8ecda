//! In-memory ZIP fixtures for unit tests.
//!
//! # Panics
//!
//! Every method panics on I/O errors; test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Fixture {
    File {
        name: String,
        data: Vec<u8>,
        mode: u32,
    },
    Directory {
        name: String,
        mode: u32,
    },
    RawName {
        raw: Vec<u8>,
        data: Vec<u8>,
    },
}

/// Builds ZIP archives entry by entry, in insertion order.
///
/// ```ignore
/// let bytes = ZipBuilder::new()
///     .file("a.txt", b"hello")
///     .directory("data/", 0o755)
///     .build();
/// ```
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<Fixture>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regular file with mode 0o644.
    pub fn file(self, name: &str, data: &[u8]) -> Self {
        self.file_with_mode(name, data, 0o644)
    }

    pub fn file_with_mode(mut self, name: &str, data: &[u8], mode: u32) -> Self {
        self.entries.push(Fixture::File {
            name: name.to_string(),
            data: data.to_vec(),
            mode,
        });
        self
    }

    /// Adds a directory marker entry. `name` should end with `/`.
    pub fn directory(mut self, name: &str, mode: u32) -> Self {
        self.entries.push(Fixture::Directory {
            name: name.to_string(),
            mode,
        });
        self
    }

    /// Adds a file whose stored name is `raw` verbatim, without the UTF-8
    /// flag, the way legacy archivers write names.
    pub fn raw_name_file(mut self, raw: &[u8], data: &[u8]) -> Self {
        self.entries.push(Fixture::RawName {
            raw: raw.to_vec(),
            data: data.to_vec(),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut patches = Vec::new();

        for entry in self.entries {
            match entry {
                Fixture::File { name, data, mode } => {
                    zip.start_file(name, options.unix_permissions(mode)).unwrap();
                    zip.write_all(&data).unwrap();
                }
                Fixture::Directory { name, mode } => {
                    zip.add_directory(name, options.unix_permissions(mode))
                        .unwrap();
                }
                Fixture::RawName { raw, data } => {
                    // Written under an ASCII stand-in of the same length, then
                    // patched in both the local and central headers.
                    let placeholder: Vec<u8> = raw
                        .iter()
                        .map(|&b| if b.is_ascii() { b } else { b'~' })
                        .collect();
                    let name = String::from_utf8(placeholder.clone()).unwrap();
                    zip.start_file(name, options.unix_permissions(0o644)).unwrap();
                    zip.write_all(&data).unwrap();
                    patches.push((placeholder, raw));
                }
            }
        }

        let mut bytes = zip.finish().unwrap().into_inner();
        for (placeholder, raw) in patches {
            replace_all(&mut bytes, &placeholder, &raw);
        }
        bytes
    }
}

/// Rewrites the external attributes of `name` in the central directory to
/// carry `mode` as a Unix mode, the way Info-ZIP stores it. The zip writer
/// masks modes to 0o777, so high bits can only be produced this way.
pub fn set_unix_mode(bytes: &mut [u8], name: &str, mode: u32) {
    const CENTRAL_HEADER: &[u8] = b"PK\x01\x02";
    const NAME_OFFSET: usize = 46;

    let mut i = 0;
    while i + NAME_OFFSET <= bytes.len() {
        if &bytes[i..i + 4] == CENTRAL_HEADER {
            let name_len = u16::from_le_bytes([bytes[i + 28], bytes[i + 29]]) as usize;
            let start = i + NAME_OFFSET;
            if bytes.get(start..start + name_len) == Some(name.as_bytes()) {
                // Version made by: host system 3 is Unix
                bytes[i + 5] = 3;
                bytes[i + 38..i + 42].copy_from_slice(&(mode << 16).to_le_bytes());
                return;
            }
        }
        i += 1;
    }
    panic!("no central directory entry named {name}");
}

fn replace_all(haystack: &mut [u8], needle: &[u8], replacement: &[u8]) {
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            haystack[i..i + needle.len()].copy_from_slice(replacement);
            i += needle.len();
        } else {
            i += 1;
        }
    }
}
